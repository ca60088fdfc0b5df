//! Wallet demo: state that survives restarts.
//!
//! Usage:
//!   cargo run --example wallet              # show the wallet
//!   cargo run --example wallet -- increase  # move $1 into the mobile wallet
//!   cargo run --example wallet -- decrease  # move $1 back into savings
//!   cargo run --example wallet -- reset     # forget everything
//!
//! Set `PERSISTA_DATA` to choose where the state lives (default: ./wallet-data).
//! `RUST_LOG=persista=debug` shows every read and write.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use persista::{ForegroundLoop, ForegroundQueue, Persista, TypeDescriptor};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct WalletState {
    mobile_wallet_amount: u32,
    #[serde(default = "default_total")]
    total_dollars_available: u32,
}

fn default_total() -> u32 {
    10
}

impl WalletState {
    fn new(mobile_wallet_amount: u32) -> Self {
        Self {
            mobile_wallet_amount,
            total_dollars_available: default_total(),
        }
    }

    fn savings_wallet_amount(&self) -> u32 {
        self.total_dollars_available.saturating_sub(self.mobile_wallet_amount)
    }

    fn can_increase(&self) -> bool {
        self.mobile_wallet_amount < self.total_dollars_available
    }

    fn can_decrease(&self) -> bool {
        self.mobile_wallet_amount > 0
    }
}

/// Holds the current state; every change is persisted before it is applied.
struct Wallet {
    persista: Persista,
    state: Arc<Mutex<WalletState>>,
}

impl Wallet {
    fn new(persista: Persista) -> Self {
        let state = Arc::new(Mutex::new(WalletState::new(0)));
        let initial = *state.lock().unwrap();
        let target = Arc::clone(&state);
        persista.read_with(initial, TypeDescriptor::of(), move |loaded| {
            if let Ok(loaded) = loaded {
                *target.lock().unwrap() = loaded;
            }
        });
        Self { persista, state }
    }

    fn state(&self) -> WalletState {
        *self.state.lock().unwrap()
    }

    /// Returns false when already at the limit and nothing was saved.
    fn increase_mobile_wallet(&self) -> bool {
        let current = self.state();
        if !current.can_increase() {
            return false;
        }
        self.save(WalletState {
            mobile_wallet_amount: current.mobile_wallet_amount + 1,
            ..current
        });
        true
    }

    fn decrease_mobile_wallet(&self) -> bool {
        let current = self.state();
        if !current.can_decrease() {
            return false;
        }
        self.save(WalletState {
            mobile_wallet_amount: current.mobile_wallet_amount - 1,
            ..current
        });
        true
    }

    fn reset_mobile_wallet(&self) {
        let target = Arc::clone(&self.state);
        self.persista
            .clear_with(TypeDescriptor::<WalletState>::of(), move |_| {
                info!("persistent storage cleared");
                *target.lock().unwrap() = WalletState::new(0);
            });
    }

    fn save(&self, next: WalletState) {
        let target = Arc::clone(&self.state);
        self.persista.write_with(next, TypeDescriptor::of(), move |saved| {
            if let Ok(saved) = saved {
                info!(amount = saved.mobile_wallet_amount, "mobile wallet updated");
                *target.lock().unwrap() = saved;
            }
        });
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    persista::init_tracing();

    let data_path = std::env::var_os("PERSISTA_DATA")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("wallet-data"));

    let (queue, mut foreground) = ForegroundQueue::new();
    let persista = Persista::builder(&data_path).foreground(queue).build()?;
    info!(store = %persista.store_dir().display(), "wallet store ready");

    let wallet = Wallet::new(persista);
    settle(&mut foreground).await;

    let issued = match std::env::args().nth(1).as_deref() {
        None | Some("show") => false,
        Some("increase") => wallet.increase_mobile_wallet(),
        Some("decrease") => wallet.decrease_mobile_wallet(),
        Some("reset") => {
            wallet.reset_mobile_wallet();
            true
        }
        Some(other) => bail!("unknown command: {other} (expected show, increase, decrease or reset)"),
    };
    if issued {
        settle(&mut foreground).await;
    } else {
        info!("nothing to save");
    }

    let state = wallet.state();
    println!(
        "mobile wallet: ${}  savings: ${}  (total ${})",
        state.mobile_wallet_amount,
        state.savings_wallet_amount(),
        state.total_dollars_available
    );
    Ok(())
}

/// Run the callback of the operation just issued.
async fn settle(foreground: &mut ForegroundLoop) {
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), foreground.next()).await;
}
