/// Exit codes: the signal number after SIGINT/SIGTERM, 1 if startup fails,
/// 0 if interrupted before the server is up
#[tokio::main]
async fn main() {
    let code = defi_api::app::run().await;
    std::process::exit(code);
}
