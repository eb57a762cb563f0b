use cucumber::{cli, World};
use cucumber_tests::features::PortalWorld;

#[tokio::main]
async fn main() {
    // Run every RBAC feature with the standard cucumber CLI
    PortalWorld::cucumber()
        .with_cli::<()>(cli::Opts::parsed())
        .run_and_exit("features/")
        .await;
}
