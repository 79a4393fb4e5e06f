pub mod artifact;
pub mod classifier;
pub mod loss;

pub use artifact::{ArtifactConfig, ModelArtifact};
pub use classifier::{DistilBertTokenClassifier, TokenClassifier};
pub use loss::masked_token_loss;
