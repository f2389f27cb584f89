//! Shared test harness: starts a gateway server on an ephemeral port.

use formdb_gateway::{Gateway, GatewayServer};

pub async fn start_gateway(gateway: Gateway) -> (GatewayServer, String) {
    let mut server = GatewayServer::new("127.0.0.1:0".parse().unwrap(), gateway);
    server.start().await.expect("failed to start gateway server");
    let base_url = format!("http://{}", server.addr());
    (server, base_url)
}
