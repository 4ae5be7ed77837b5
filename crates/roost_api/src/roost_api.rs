use crate::http::{run_http_server, HttpServerConfig, RoostApiServices};
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct RoostApi {
    services: RoostApiServices,
    config: HttpServerConfig,
}

impl RoostApi {
    pub fn new(services: RoostApiServices, config: HttpServerConfig) -> Self {
        debug!("initializing Roost API module");
        Self { services, config }
    }

    pub fn into_runner_process(
        self,
    ) -> impl FnOnce(
        CancellationToken,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = anyhow::Result<()>> + Send>,
    > {
        move |ctx| Box::pin(async move { run_http_server(self.config, self.services, ctx).await })
    }
}
