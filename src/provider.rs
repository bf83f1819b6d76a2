use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::api::LeagueApi;
use crate::config::Config;
use crate::orchestrator;
use crate::state::{Delta, ProviderCommand};

/// Worker side of the app. Each command runs on its own thread so a slow screen never delays
/// the league header or another screen's mount.
pub fn spawn_provider(
    api: LeagueApi,
    config: Config,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) {
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::Run { id, request } => {
                    let api = api.clone();
                    let config = config.clone();
                    let worker_tx = tx.clone();
                    let spawned = thread::Builder::new()
                        .name(format!("fetch-{:?}", id.query))
                        .spawn(move || {
                            orchestrator::run_request(&api, id, &request, &config, &worker_tx)
                        });
                    if let Err(err) = spawned {
                        let _ = tx.send(Delta::Log(format!(
                            "[WARN] Could not start fetch worker: {err}"
                        )));
                        let _ = tx.send(Delta::Settled(id));
                    }
                }
            }
        }
    });
}
