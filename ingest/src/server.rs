use std::future::Future;
use std::path::PathBuf;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::router;
use crate::sinks::{FileSink, PrintSink};
use crate::time::SystemTime;

pub async fn serve<F>(config: Config, listener: TcpListener, shutdown: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = if config.print_sink {
        router::router(SystemTime {}, PrintSink {}, config.export_prometheus)
    } else {
        let sink = FileSink::new(
            config.data_folder_path.map(PathBuf::from),
            config.logs_folder_path.map(PathBuf::from),
        );
        router::router(SystemTime {}, sink, config.export_prometheus)
    };

    tracing::info!("listening on {:?}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .unwrap()
}
