//! VAT receipts

pub mod descriptor;
pub mod handlers;
pub mod issuer;
pub mod model;

pub use descriptor::ReceiptDescriptor;
pub use issuer::ReceiptIssuer;
pub use model::{IssueReceiptRequest, NewVatReceipt, VatReceipt};
