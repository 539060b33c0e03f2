pub mod github;
pub mod inputs;
pub mod publish;
pub mod result;
