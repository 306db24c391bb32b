pub mod irp;
pub mod iva;

pub use irp::{compute_irp, IrpBracket, IrpSummary};
pub use iva::{compute_iva, IvaSummary};
