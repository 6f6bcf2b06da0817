pub mod mse;
pub mod l1;
pub mod hinge;
pub mod cross_entropy;
pub mod loss_type;

pub use mse::MseLoss;
pub use l1::L1Loss;
pub use hinge::HingeLoss;
pub use cross_entropy::SparseCrossEntropyLoss;
pub use loss_type::LossType;
