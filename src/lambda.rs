#[cfg(feature = "lambda")]
use ecs_describer::utils::logger;
#[cfg(feature = "lambda")]
use ecs_describer::{ClusterSnapshot, DescribeRequest, LambdaConfig, LambdaRequest};
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use serde::Serialize;

#[cfg(feature = "lambda")]
#[derive(Serialize)]
pub struct Response {
    pub cluster: String,
    pub region: String,
    pub service_count: usize,
    pub task_count: usize,
    pub services: ClusterSnapshot,
}

#[cfg(feature = "lambda")]
async fn function_handler(event: LambdaEvent<LambdaRequest>) -> Result<Response, Error> {
    tracing::info!("Starting ECS describe Lambda function");

    let config = LambdaConfig::from_request(&event.payload).map_err(|e| {
        tracing::error!("{} ({})", e, e.recovery_suggestion());
        Box::new(e) as Box<dyn std::error::Error + Send + Sync>
    })?;

    let request = DescribeRequest::from_config(&config)
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let snapshot = request.run().await.map_err(|e| {
        tracing::error!(
            "Describe failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        Box::new(e) as Box<dyn std::error::Error + Send + Sync>
    })?;

    let response = Response {
        cluster: request.cluster.name().to_string(),
        region: request.cluster.region().to_string(),
        service_count: snapshot.len(),
        task_count: snapshot.task_count(),
        services: snapshot,
    };

    tracing::info!(
        "Described {} services and {} tasks",
        response.service_count,
        response.task_count
    );
    Ok(response)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
