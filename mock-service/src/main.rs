use std::net::SocketAddr;

#[tokio::main]
async fn main() {
    let addr: SocketAddr = "0.0.0.0:3002".parse().unwrap();
    println!("mock service listening on {addr}");
    mock_service::run(addr).await;
}
