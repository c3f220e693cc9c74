//! Cancellation and transfer refunds

mod engine;

pub use engine::{
    compute_refund, triangular_refund_factor, PolicyProductPricing, RefundBreakdown, RefundInput,
    RefundOperation, DEFAULT_CANCELLATION_FEE, DEFAULT_TRANSFER_FEE, FULL_REFUND_WINDOW_DAYS,
};
