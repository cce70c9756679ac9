/// Wallet Core Module
///
/// Operation modules behind the manager:
///
/// - `wallet_ops.rs` - Wallet lifecycle (create, import, summary, clear)
/// - `account_ops.rs` - Derived-account management and switching

pub mod account_ops;
pub mod wallet_ops;
