//! The display surface the bridge renders into. The terminal implementation
//! is the production surface; tests substitute a recording fake.

/// Display regions driven by the bridge: the account panel, the balance
/// line, and user-facing notices.
pub trait Surface: Send + Sync {
    /// Render the authorized account address and switch from the connect
    /// affordance to the account panel.
    fn show_account(&self, address: &str);

    /// Render the raw integer token balance.
    fn show_balance(&self, balance: &str);

    /// Show a user-facing notice (validation problems, call results,
    /// blocking environment errors).
    fn notify(&self, notice: &str);
}

/// Terminal rendition of the display surface.
#[derive(Debug, Default)]
pub struct TerminalSurface;

impl TerminalSurface {
    pub fn new() -> Self {
        Self
    }
}

impl Surface for TerminalSurface {
    fn show_account(&self, address: &str) {
        println!("Account:  {}", address);
    }

    fn show_balance(&self, balance: &str) {
        println!("Balance:  {}", balance);
    }

    fn notify(&self, notice: &str) {
        println!("! {}", notice);
    }
}
