#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    // Set up logging for development
    env_logger::init();

    // File dialogs run on the tokio runtime entered above
    mindcanvas::run_app()
}
