// Comic generation: request handling and the end-to-end pipeline.
// Model calls go through llm_client and render; layout stays pure.

pub mod generator;
pub mod handlers;
