//! Line-oriented operator console
//!
//! Stands in for the demo's screens: a feature phone, an IVR call, the CHW
//! dashboard and the payer summary all driven from stdin.

use crate::config::KoniConfig;
use crate::runtime::{ConsoleSpeech, NoSpeechInput, Persistence};
use crate::scenario::{Scenario, ScenarioParseError};
use crate::store::query::dispatch_request_for;
use crate::store::{Action, EventStore, PayerSummary, ResolveRequest, StoreEvent, StoreState};
use crate::ussd::state::KeyParseError;
use crate::ussd::{Key, Screen, UssdPhone};
use crate::voice::{CallPhase, PromptId, PromptParseError, ReplySource, VoiceSession};
use std::fmt::Write as _;
use std::ops::ControlFlow;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

const HELP: &str = "\
Commands:
  ussd <0-9|*|#|send|clr>   press a key on the feature phone
  call                      start a voice call
  ask <greet|meds|danger|close>
  reply <text>              reply to use when speech input is unavailable
  hangup                    abandon the current call
  dispatch <patient-id>     send a nurse to a patient
  resolve <alert-id> <dispatch-id>
  scenario <stroke|foot|pree|cholera>
  reset                     restore the demo dataset
  show                      print dashboards
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ussd(Key),
    Call,
    Ask(PromptId),
    Reply(String),
    Hangup,
    Dispatch(String),
    Resolve { alert_id: String, dispatch_id: String },
    Scenario(Scenario),
    Reset,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}', type `help`")]
    Unknown(String),
    #[error("`{command}` needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },
    #[error(transparent)]
    Key(#[from] KeyParseError),
    #[error(transparent)]
    Prompt(#[from] PromptParseError),
    #[error(transparent)]
    Scenario(#[from] ScenarioParseError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let required = |command: &'static str, what: &'static str| {
            if rest.is_empty() {
                Err(CommandError::MissingArgument { command, what })
            } else {
                Ok(rest)
            }
        };

        match word.to_ascii_lowercase().as_str() {
            "ussd" => Ok(Command::Ussd(required("ussd", "a key")?.parse()?)),
            "call" => Ok(Command::Call),
            "ask" => Ok(Command::Ask(required("ask", "a prompt")?.parse()?)),
            "reply" => Ok(Command::Reply(required("reply", "the reply text")?.to_string())),
            "hangup" => Ok(Command::Hangup),
            "dispatch" => Ok(Command::Dispatch(
                required("dispatch", "a patient id")?.to_string(),
            )),
            "resolve" => {
                let mut ids = rest.split_whitespace();
                match (ids.next(), ids.next()) {
                    (Some(alert_id), Some(dispatch_id)) => Ok(Command::Resolve {
                        alert_id: alert_id.to_string(),
                        dispatch_id: dispatch_id.to_string(),
                    }),
                    _ => Err(CommandError::MissingArgument {
                        command: "resolve",
                        what: "an alert id and a dispatch id",
                    }),
                }
            }
            "scenario" => Ok(Command::Scenario(required("scenario", "a name")?.parse()?)),
            "reset" => Ok(Command::Reset),
            "show" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}

type ConsoleCall<P> = VoiceSession<NoSpeechInput, ConsoleSpeech, P>;

pub struct Console<P: Persistence> {
    config: KoniConfig,
    store: Arc<EventStore<P>>,
    phone: UssdPhone<P>,
    call: Option<ConsoleCall<P>>,
    /// Reply typed before a call was started
    pending_reply: Option<String>,
}

impl<P: Persistence> Console<P> {
    pub fn new(config: KoniConfig, store: Arc<EventStore<P>>) -> Self {
        let phone = UssdPhone::new(Arc::clone(&store), config.caller_name.clone());
        Self {
            config,
            store,
            phone,
            call: None,
            pending_reply: None,
        }
    }

    /// Read commands from stdin until `quit` or end of input, printing store
    /// notifications as they arrive.
    pub async fn run(mut self) -> std::io::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut events = BroadcastStream::new(self.store.subscribe());

        println!("{HELP}");
        println!("{}", render_screen(&self.phone.screen()));

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<Command>() {
                        Ok(command) => match self.execute(command).await {
                            ControlFlow::Continue(output) => {
                                if !output.is_empty() {
                                    println!("{output}");
                                }
                            }
                            ControlFlow::Break(()) => break,
                        },
                        Err(e) => println!("! {e}"),
                    }
                }
                Some(event) = events.next() => {
                    // Lagged receivers just miss a few toasts
                    if let Ok(event) = event {
                        println!("* {}", toast(&event));
                    }
                }
            }
        }

        tracing::info!("Console closed");
        Ok(())
    }

    pub async fn execute(&mut self, command: Command) -> ControlFlow<(), String> {
        let output = match command {
            Command::Ussd(key) => render_screen(&self.phone.press(key)),
            Command::Call => self.start_call(),
            Command::Ask(prompt) => self.ask(prompt).await,
            Command::Reply(text) => {
                if let Some(call) = self.call.as_mut() {
                    call.set_simulated_reply(text.clone());
                }
                self.pending_reply = Some(text);
                "Reply set".to_string()
            }
            Command::Hangup => self.hang_up(),
            Command::Dispatch(patient_id) => self.dispatch(&patient_id),
            Command::Resolve {
                alert_id,
                dispatch_id,
            } => {
                let state = self.store.dispatch(Action::Resolve(ResolveRequest {
                    alert_id: Some(alert_id.clone()),
                    dispatch_id: Some(dispatch_id.clone()),
                }));
                match (state.alert(&alert_id), state.dispatch(&dispatch_id)) {
                    (Some(_), Some(_)) => {
                        format!("Resolved alert {alert_id}, closed dispatch {dispatch_id}")
                    }
                    (Some(_), None) => {
                        format!("Resolved alert {alert_id}; no dispatch {dispatch_id}")
                    }
                    (None, Some(_)) => {
                        format!("No alert {alert_id}; closed dispatch {dispatch_id}")
                    }
                    (None, None) => format!("No alert {alert_id} or dispatch {dispatch_id}"),
                }
            }
            Command::Scenario(scenario) => {
                for action in scenario.actions() {
                    self.store.dispatch(action);
                }
                scenario.headline().to_string()
            }
            Command::Reset => {
                self.hang_up();
                self.pending_reply = None;
                self.store.dispatch(Action::ResetDemo);
                "Demo data reset".to_string()
            }
            Command::Show => {
                let mut out = render_dashboards(&self.store.snapshot());
                if let Some(call) = &self.call {
                    let _ = write!(out, "\n== Current call ({:?}) ==", call.phase());
                    for line in call.transcript() {
                        let _ = write!(out, "\n{:?}: {}", line.role, line.text);
                    }
                }
                out
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return ControlFlow::Break(()),
        };
        ControlFlow::Continue(output)
    }

    fn start_call(&mut self) -> String {
        if self
            .call
            .as_ref()
            .is_some_and(|call| !matches!(call.phase(), CallPhase::Ended | CallPhase::Abandoned))
        {
            return "A call is already in progress".to_string();
        }
        let mut call = VoiceSession::new(
            Arc::clone(&self.store),
            NoSpeechInput,
            ConsoleSpeech,
            self.config.listen_timeout,
        )
        .with_language(self.config.language);
        if let Some(reply) = &self.pending_reply {
            call.set_simulated_reply(reply.clone());
        }
        self.call = Some(call);
        tracing::info!(language = %self.config.language, "Voice call started");
        format!("Call connected ({})", self.config.language)
    }

    async fn ask(&mut self, prompt: PromptId) -> String {
        let Some(call) = self.call.as_mut() else {
            return "No active call, use `call` first".to_string();
        };
        match call.ask(prompt).await {
            Ok(outcome) => {
                let source = match outcome.source {
                    ReplySource::Heard => "heard",
                    ReplySource::Simulated => "simulated",
                    ReplySource::Canned => "canned",
                };
                let mut out = format!(
                    "CALLER ({source})> {}\n  severity: {}",
                    outcome.reply, outcome.triage.severity
                );
                if !outcome.triage.notes.is_empty() {
                    let _ = write!(out, " ({})", outcome.triage.notes.join("; "));
                }
                if outcome.closed {
                    out.push_str("\n  Call closed, nurse notified");
                }
                out
            }
            Err(e) => e.to_string(),
        }
    }

    fn hang_up(&mut self) -> String {
        match self.call.take() {
            Some(call) if call.phase() != CallPhase::Ended => {
                call.hangup_handle().cancel();
                "Call abandoned".to_string()
            }
            Some(_) => "Call already ended".to_string(),
            None => "No active call".to_string(),
        }
    }

    fn dispatch(&self, patient_id: &str) -> String {
        let Some(request) = dispatch_request_for(&self.store.snapshot(), patient_id) else {
            return format!("No patient {patient_id}");
        };
        let alert = request.alert_id.clone();
        let state = self.store.dispatch(Action::Dispatch(request));
        let dispatch_id = state.dispatches.first().map_or("?", |d| d.id.as_str());
        match alert {
            Some(alert_id) => format!("Dispatch {dispatch_id} en route (alert {alert_id})"),
            None => format!("Dispatch {dispatch_id} en route"),
        }
    }
}

fn render_screen(screen: &Screen) -> String {
    let mut out = format!("[{:?}]\n{}\n> {}", screen.step, screen.text, screen.input);
    if let Some((notice, ttl)) = screen.notice {
        let _ = write!(out, "\n! {notice} ({}ms)", ttl.as_millis());
    }
    if let Some(alert_id) = &screen.raised_alert {
        let _ = write!(out, "\nEscalated as alert {alert_id}");
    }
    out
}

fn render_dashboards(state: &StoreState) -> String {
    let summary = PayerSummary::from_state(state);
    let m = summary.metrics;
    let mut out = String::new();

    let _ = writeln!(out, "== Payer ==");
    let _ = writeln!(
        out,
        "enrolled {} | weekly check-ins {} | early alerts {} | critical intercepts {} | outbreaks {}",
        m.enrolled, m.weekly_checkins, m.early_alerts, m.crit_intercepted, m.outbreaks_flagged
    );
    let _ = writeln!(
        out,
        "cost ${} | avoided ${} | ROI {:.1}% | critical patients {}",
        m.program_cost_usd,
        m.est_costs_avoided_usd,
        summary.roi_percent,
        summary.critical_patients
    );

    let _ = writeln!(out, "== Patients ==");
    for p in &state.patients {
        let _ = writeln!(
            out,
            "{:<12} {:<28} {:?} risk {:>3}  {}",
            p.id, p.name, p.status, p.risk, p.issue
        );
    }

    let _ = writeln!(out, "== Alerts ==");
    for a in &state.alerts {
        let _ = writeln!(
            out,
            "{} {:?} {} {:?}: {}",
            a.id, a.kind, a.severity, a.status, a.message
        );
    }

    let _ = writeln!(out, "== Dispatches ==");
    for d in &state.dispatches {
        let _ = writeln!(
            out,
            "{} {} {} {:?}: {}",
            d.id,
            d.alert_id.as_deref().unwrap_or("-"),
            d.zone,
            d.status,
            d.reason
        );
    }

    let _ = writeln!(out, "== Outbreaks ==");
    for o in &state.outbreaks {
        let _ = writeln!(
            out,
            "{} in {}: {} reports, {} ({:?})",
            o.name, o.zone, o.reports, o.window, o.status
        );
    }
    out.trim_end().to_string()
}

fn toast(event: &StoreEvent) -> String {
    match event {
        StoreEvent::Applied { action, snapshot } => match *action {
            "RAISE_ALERT" => snapshot.alerts.first().map_or_else(
                || "Alert raised".to_string(),
                |a| format!("New {} alert: {}", a.severity, a.message),
            ),
            "ADD_CALL" => "Call logged".to_string(),
            "DISPATCH" => snapshot.dispatches.first().map_or_else(
                || "Nurse dispatched".to_string(),
                |d| format!("Nurse dispatched to {}", d.zone),
            ),
            "RESOLVE" => "Alert resolved".to_string(),
            "FLAG_OUTBREAK" => snapshot.outbreaks.first().map_or_else(
                || "Outbreak flagged".to_string(),
                |o| format!("Outbreak signal: {} in {}", o.name, o.zone),
            ),
            "RESET_DEMO" => "Demo reset".to_string(),
            other => other.to_string(),
        },
        StoreEvent::PersistenceFailed { key, message } => match key {
            Some(key) => format!("Could not save {key}: {message}"),
            None => format!("Could not update saved data: {message}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::testing::MemoryPersistence;
    use crate::store::{AlertStatus, DispatchStatus};
    use crate::ussd::StepId;
    use std::time::Duration;

    fn console() -> Console<MemoryPersistence> {
        let config = KoniConfig {
            db_path: "/unused".into(),
            listen_timeout: Duration::from_millis(50),
            language: crate::voice::Language::English,
            caller_name: "Abena".to_string(),
        };
        Console::new(config, Arc::new(EventStore::open(MemoryPersistence::new())))
    }

    async fn run(console: &mut Console<MemoryPersistence>, line: &str) -> String {
        match console.execute(line.parse().unwrap()).await {
            ControlFlow::Continue(out) => out,
            ControlFlow::Break(()) => panic!("unexpected quit"),
        }
    }

    #[test]
    fn parses_commands() {
        assert_eq!("ussd 1".parse(), Ok(Command::Ussd(Key::Digit(1))));
        assert_eq!("USSD send".parse(), Ok(Command::Ussd(Key::Send)));
        assert_eq!("ask danger".parse(), Ok(Command::Ask(PromptId::DangerProbe)));
        assert_eq!(
            "reply  my feet are swollen ".parse(),
            Ok(Command::Reply("my feet are swollen".to_string()))
        );
        assert_eq!(
            "resolve a1 d1".parse(),
            Ok(Command::Resolve {
                alert_id: "a1".to_string(),
                dispatch_id: "d1".to_string()
            })
        );
        assert_eq!("scenario foot".parse(), Ok(Command::Scenario(Scenario::FootSepsis)));
        assert_eq!("exit".parse(), Ok(Command::Quit));
    }

    #[test]
    fn rejects_bad_commands() {
        assert_eq!(
            "dance".parse::<Command>(),
            Err(CommandError::Unknown("dance".to_string()))
        );
        assert!(matches!(
            "ussd".parse::<Command>(),
            Err(CommandError::MissingArgument { command: "ussd", .. })
        ));
        assert!(matches!(
            "resolve a1".parse::<Command>(),
            Err(CommandError::MissingArgument { command: "resolve", .. })
        ));
        assert!(matches!("ussd 12".parse::<Command>(), Err(CommandError::Key(_))));
        assert!(matches!("ask why".parse::<Command>(), Err(CommandError::Prompt(_))));
    }

    #[tokio::test]
    async fn ussd_critical_path_raises_alert() {
        let mut console = console();
        for line in ["ussd 1", "ussd send", "ussd 1", "ussd send", "ussd 1", "ussd send", "ussd 1"] {
            run(&mut console, line).await;
        }
        let out = run(&mut console, "ussd send").await;
        assert!(out.contains("Escalated as alert"), "{out}");
        assert_eq!(console.phone.state().step, StepId::CritEnd);
        assert_eq!(console.store.snapshot().alerts.len(), 1);
    }

    #[tokio::test]
    async fn invalid_ussd_choice_shows_notice() {
        let mut console = console();
        run(&mut console, "ussd 9").await;
        let out = run(&mut console, "ussd send").await;
        assert!(out.contains("Invalid option"), "{out}");
    }

    #[tokio::test]
    async fn voice_call_uses_typed_reply() {
        let mut console = console();
        assert!(run(&mut console, "ask greet").await.contains("No active call"));

        run(&mut console, "reply I feel fine").await;
        run(&mut console, "call").await;
        let out = run(&mut console, "ask greet").await;
        assert!(out.contains("CALLER (simulated)> I feel fine"), "{out}");
        assert!(run(&mut console, "call").await.contains("already in progress"));

        let out = run(&mut console, "ask danger").await;
        assert!(out.contains("Call closed"), "{out}");
        assert!(run(&mut console, "ask meds").await.contains("ended"));
        assert_eq!(console.store.snapshot().calls.len(), 1);

        let out = run(&mut console, "show").await;
        assert!(out.contains("== Current call (Ended) =="), "{out}");
        assert!(out.contains("Patient: I feel fine"), "{out}");
    }

    #[tokio::test]
    async fn hangup_emits_nothing() {
        let mut console = console();
        run(&mut console, "call").await;
        assert_eq!(run(&mut console, "hangup").await, "Call abandoned");
        assert_eq!(run(&mut console, "hangup").await, "No active call");
        assert!(console.store.snapshot().calls.is_empty());
    }

    #[tokio::test]
    async fn dispatch_then_resolve() {
        let mut console = console();
        run(&mut console, "scenario stroke").await;
        let out = run(&mut console, "dispatch pX1").await;
        assert!(out.contains("en route"), "{out}");

        let state = console.store.snapshot();
        let dispatch = state.dispatches[0].clone();
        let alert_id = dispatch.alert_id.clone().unwrap();
        assert_eq!(state.alert(&alert_id).unwrap().status, AlertStatus::Dispatched);

        run(&mut console, &format!("resolve {alert_id} {}", dispatch.id)).await;
        let state = console.store.snapshot();
        assert_eq!(state.alert(&alert_id).unwrap().status, AlertStatus::Resolved);
        assert_eq!(state.dispatch(&dispatch.id).unwrap().status, DispatchStatus::Closed);
    }

    #[tokio::test]
    async fn unknown_patient_dispatch_is_reported() {
        let mut console = console();
        assert_eq!(run(&mut console, "dispatch nobody").await, "No patient nobody");
        assert!(console.store.snapshot().dispatches.is_empty());
    }

    #[tokio::test]
    async fn show_and_reset() {
        let mut console = console();
        run(&mut console, "scenario cholera").await;
        let out = run(&mut console, "show").await;
        assert!(out.contains("== Payer =="));
        assert!(out.contains("Mrs. Adongo"));
        assert!(out.contains("outbreaks 2"), "{out}");

        run(&mut console, "reset").await;
        assert_eq!(console.store.snapshot().outbreaks.len(), 1);
        assert_eq!(console.store.persistence().clear_count(), 1);
    }

    #[tokio::test]
    async fn quit_breaks() {
        let mut console = console();
        assert_eq!(console.execute(Command::Quit).await, ControlFlow::Break(()));
    }

    #[test]
    fn toast_for_persistence_failure() {
        let event = StoreEvent::PersistenceFailed {
            key: Some(crate::runtime::StoreKey::Alerts),
            message: "disk full".to_string(),
        };
        assert_eq!(toast(&event), "Could not save koni_alerts: disk full");

        let event = StoreEvent::PersistenceFailed {
            key: None,
            message: "disk full".to_string(),
        };
        assert_eq!(toast(&event), "Could not update saved data: disk full");
    }

    #[tokio::test]
    async fn resolve_reports_each_reference() {
        let mut console = console();
        run(&mut console, "scenario foot").await;
        run(&mut console, "dispatch pX2").await;
        let state = console.store.snapshot();
        let alert_id = state.alerts[0].id.clone();
        let dispatch_id = state.dispatches[0].id.clone();

        assert_eq!(
            run(&mut console, &format!("resolve {alert_id} d-missing")).await,
            format!("Resolved alert {alert_id}; no dispatch d-missing")
        );
        assert_eq!(
            run(&mut console, &format!("resolve a-missing {dispatch_id}")).await,
            format!("No alert a-missing; closed dispatch {dispatch_id}")
        );
        assert_eq!(
            run(&mut console, "resolve a-missing d-missing").await,
            "No alert a-missing or dispatch d-missing"
        );
        let state = console.store.snapshot();
        assert_eq!(state.alert(&alert_id).unwrap().status, AlertStatus::Resolved);
        assert_eq!(state.dispatch(&dispatch_id).unwrap().status, DispatchStatus::Closed);
    }
}
