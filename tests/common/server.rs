use crate::common::compress;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn object_path(oid: &str) -> String {
    format!("/.git/objects/{}/{}", &oid[..2], &oid[2..])
}

pub fn base_url(server: &MockServer) -> String {
    format!("{}/.git/", server.uri())
}

/// Directory name the dumper derives from the mock server's address
pub fn destination_name(server: &MockServer) -> String {
    let address = server.address();
    format!("{}_{}", address.ip(), address.port())
}

pub async fn mount_index(server: &MockServer, index: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path("/.git/index"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(index))
        .mount(server)
        .await;
}

pub async fn mount_object(server: &MockServer, oid: &str, content: &[u8]) {
    Mock::given(method("GET"))
        .and(path(object_path(oid)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(compress(content)))
        .mount(server)
        .await;
}
