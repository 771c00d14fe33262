mod job_publisher;
mod result_consumer;

pub use job_publisher::BrokerJobPublisher;
pub use result_consumer::ResultHandler;
