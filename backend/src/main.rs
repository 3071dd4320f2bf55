#[tokio::main]
async fn main() {
    wellness::start_server().await;
}
