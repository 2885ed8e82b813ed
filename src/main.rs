use std::io;
use std::time::Duration;
use stepflow::inputs::{ConfirmPrompt, TextPrompt};
use stepflow::session::Session;
use stepflow::terminal::{KeyCode, Terminal, TerminalEvent};
use stepflow::ui::progress::{progress_line, step_header};
use stepflow::{GateCheck, SequencerEvent, Step, StepContext, StepRenderer};
use tracing_subscriber::EnvFilter;

const VIEW_WIDTH: usize = 60;

/// Read-only summary of everything gathered so far.
struct SummaryView;

impl StepRenderer for SummaryView {
    fn view(&mut self, ctx: &StepContext) -> Vec<String> {
        let mut lines = vec!["About to submit:".to_string()];
        for (field, value) in ctx.values() {
            lines.push(format!("  {field}: {}", value.to_json()));
        }
        lines.push(String::new());
        lines.push("Enter submits, Ctrl+Backspace goes back, Esc abandons.".to_string());
        lines
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
    }
}

fn run() -> io::Result<()> {
    let mut terminal = Terminal::new()?;
    terminal.enter_raw_mode()?;

    let result = event_loop(&mut terminal);

    terminal.exit_raw_mode()?;
    match result? {
        Some(state) => println!("Submitted:\n{state}"),
        None => println!("Abandoned."),
    }
    Ok(())
}

fn build_session() -> Session {
    let account = Step::builder("account", "Account")
        .description("Who is this for?")
        .renderer(TextPrompt::new("name", "Your name"))
        .require("name", "Name is required")
        .build();
    let newsletter = Step::builder("newsletter", "Newsletter")
        .description("Optional — Tab skips this step")
        .renderer(ConfirmPrompt::new("subscribe", "Send me release notes"))
        .optional()
        .build();
    let review = Step::builder("review", "Review")
        .renderer(SummaryView)
        .check(GateCheck::deferred(|_ctx| {
            Box::new(|| {
                // Stand-in for a slow remote precheck.
                std::thread::sleep(Duration::from_millis(300));
                Ok(())
            })
        }))
        .build();

    Session::builder()
        .steps(vec![account, newsletter, review])
        .on_complete(|state| {
            tracing::info!(fields = state.len(), "handing state to the submitter");
            Ok(())
        })
        .build()
}

fn event_loop(terminal: &mut Terminal) -> io::Result<Option<String>> {
    let mut session = build_session();
    let mut render_requested = true;
    let mut final_state: Option<String> = None;

    loop {
        if terminal.poll(Duration::from_millis(100))? {
            if let TerminalEvent::Key(key) = terminal.read_event()? {
                match key.code {
                    KeyCode::Esc => {
                        session.cancel();
                    }
                    KeyCode::Tab => {
                        session.request_skip();
                    }
                    KeyCode::Backspace if key.modifiers.control => {
                        session.request_previous();
                    }
                    _ => {
                        session.dispatch_key(key);
                    }
                }
                render_requested = true;
            }
        }

        if session.pump() {
            render_requested = true;
        }

        for event in session.take_events() {
            if let SequencerEvent::Completed { state } = event {
                final_state = Some(
                    serde_json::to_string_pretty(&state).unwrap_or_else(|_| "{}".to_string()),
                );
            }
        }

        if render_requested {
            terminal.draw_lines(&render(&mut session))?;
            render_requested = false;
        }

        if session.has_ended() {
            break;
        }
    }

    Ok(final_state)
}

fn render(session: &mut Session) -> Vec<String> {
    let mut lines = Vec::new();

    if session.config().show_progress {
        lines.push(progress_line(&session.progress(), VIEW_WIDTH));
        lines.push(String::new());
    }

    let header = session.current_step().map(|step| {
        (
            step.title.clone(),
            step.description.clone(),
            step.id.to_string(),
        )
    });
    if let Some((title, description, step_id)) = header {
        lines.extend(step_header(title.as_str(), description.as_deref(), VIEW_WIDTH));
        lines.push(String::new());
        lines.extend(session.view());
        if session.is_busy() {
            lines.push(String::new());
            lines.push("Checking…".to_string());
        }
        if let Some(message) = session.error_message(step_id.as_str()) {
            lines.push(String::new());
            lines.push(format!("! {message}"));
        }
    }

    lines
}
