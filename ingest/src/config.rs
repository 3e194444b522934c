use std::net::SocketAddr;

use envconfig::Envconfig;

#[derive(Envconfig, Clone)]
pub struct Config {
    /// Log records instead of writing them to disk. Covers local
    /// debugging and the log-only flavor of the push routes.
    #[envconfig(default = "false")]
    pub print_sink: bool,

    #[envconfig(default = "127.0.0.1:3000")]
    pub address: SocketAddr,

    // Missing paths only become an error once a write is attempted.
    pub data_folder_path: Option<String>,
    pub logs_folder_path: Option<String>,

    // Used for integration tests
    #[envconfig(default = "true")]
    pub export_prometheus: bool,
}
