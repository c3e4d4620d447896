use http::Method;

/// Destination port per HTTP method.
///
/// Reads (GET, HEAD) go to the public reader, writes (POST, PUT, PATCH, DELETE) to
/// the writer. Any other method has no destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MethodPortTable {
    read_port: u16,
    write_port: u16,
}

impl MethodPortTable {
    pub fn new(read_port: u16, write_port: u16) -> Self {
        Self {
            read_port,
            write_port,
        }
    }

    pub fn port_for(&self, method: &Method) -> Option<u16> {
        match method.as_str() {
            "GET" | "HEAD" => Some(self.read_port),
            "POST" | "PUT" | "PATCH" | "DELETE" => Some(self.write_port),
            _ => None,
        }
    }
}
