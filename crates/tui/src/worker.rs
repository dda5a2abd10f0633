use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::Sender,
    Arc,
};
use std::time::Duration;

use providers::roast::{RoastConfig, RoastHttpClient};
use roast_core::roast::{RoastClient as _, RoastError, RoastRequest};
use roast_core::submission::Ticket;
use tracing::{error, info};

pub type Outcome = (Ticket, Result<serde_json::Value, RoastError>);

/// Runs one generate call on its own thread and reports back on `tx`.
/// Setting `cancel` abandons the call and reports `RoastError::Canceled`.
pub fn spawn(cfg: RoastConfig, ticket: Ticket, tx: Sender<Outcome>, cancel: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                error!(target: "tui", "worker runtime: {}", e);
                let _ = tx.send((ticket, Err(RoastError::Other(format!("runtime: {}", e)))));
                return;
            }
        };
        let outcome = rt.block_on(async {
            let client = match RoastHttpClient::new(&cfg) {
                Ok(c) => c,
                Err(e) => {
                    error!(target: "tui", "client build error: {}", e);
                    return Err(RoastError::Other(format!("client: {}", e)));
                }
            };
            let req = RoastRequest::new(ticket.content());
            let call = client.generate(&req);
            tokio::pin!(call);
            let mut tick = tokio::time::interval(Duration::from_millis(100));
            loop {
                tokio::select! {
                    res = &mut call => break res,
                    _ = tick.tick() => {
                        if cancel.load(Ordering::Relaxed) {
                            info!(target: "tui", "worker canceled");
                            break Err(RoastError::Canceled);
                        }
                    }
                }
            }
        });
        let _ = tx.send((ticket, outcome));
    });
}
