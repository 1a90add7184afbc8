pub mod lexical;
pub mod llm_client;
pub mod topic;
