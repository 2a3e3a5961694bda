use std::sync::Arc;

use crate::{
    api::{ParseRequest, ParserResponse, ParsingStep},
    client::{ParseBackend, ParseClient},
    config::ViewerConfig,
    grammar::GrammarModel,
    infoln,
    items::{render_sets, RenderedState},
    replay::{Replay, StepView},
    symbols::SymbolTable,
    table::{decode_table, ClassifiedTable},
    warn, Logger, Result, ViewError,
};

/// Which of the three result views is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Sets,
    Table,
    Simulation,
}

impl ActiveView {
    pub const ALL: [ActiveView; 3] = [ActiveView::Sets, ActiveView::Table, ActiveView::Simulation];

    pub fn title(&self) -> &'static str {
        match self {
            ActiveView::Sets => "LR(1) Sets",
            ActiveView::Table => "Parsing Table",
            ActiveView::Simulation => "Simulation",
        }
    }
}

/// One response, decoded once. Rendering from it has no side effects.
#[derive(Debug, Clone)]
pub struct ResultView {
    response: Arc<ParserResponse>,
    steps: Arc<[ParsingStep]>,
    sets: Vec<RenderedState>,
    table: ClassifiedTable,
}

impl ResultView {
    pub fn new(response: ParserResponse, symbols: &SymbolTable) -> Self {
        let sets = render_sets(&response.lr1_sets);
        let table = decode_table(&response.parsing_table, symbols);
        ResultView {
            steps: response.parsing_steps.as_slice().into(),
            response: Arc::new(response),
            sets,
            table,
        }
    }

    pub fn response(&self) -> &ParserResponse {
        &self.response
    }

    pub fn sets(&self) -> &[RenderedState] {
        &self.sets
    }

    pub fn table(&self) -> &ClassifiedTable {
        &self.table
    }

    /// A fresh replay positioned on the first step, sharing the trace.
    pub fn replay(&self) -> Replay {
        Replay::new(self.steps.clone())
    }

    /// Everything that was clamped or skipped while decoding.
    pub fn diagnostics(&self) -> Vec<ViewError> {
        self.sets
            .iter()
            .flat_map(|s| s.issues().cloned())
            .chain(self.table.diagnostics().iter().cloned())
            .collect()
    }

    /// The simulation view shows the selected step, or the whole trace when
    /// `replay` has nothing selected.
    pub fn render(&self, view: ActiveView, replay: &Replay) -> String {
        match view {
            ActiveView::Sets => self.sets.iter().map(|s| s.to_text()).collect::<Vec<_>>().join("\n"),
            ActiveView::Table => self.table.render(),
            ActiveView::Simulation => match replay.current() {
                Some(step) => format!(
                    "{}(step {} of {})\n",
                    step.to_text(),
                    step.index + 1,
                    replay.len()
                ),
                None => "No parsing steps.\n".to_string(),
            },
        }
    }
}

/// Sequence tag of one request; later requests carry larger numbers.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    seq: u64,
    issued_at: instant::Instant,
    symbols: SymbolTable,
}

impl RequestTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The response replaced the displayed result.
    Applied,
    /// The request failed; the previous result is still displayed.
    Failed(ViewError),
    /// A later request has already settled; this completion was dropped.
    Stale,
    /// The grammar does not validate; nothing was sent.
    Blocked(ViewError),
}

/// The state owned by the top-level view: the displayed result, the
/// selected tab, the selected step and the last error.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    result: Option<ResultView>,
    active_view: ActiveView,
    replay: Replay,
    error: Option<ViewError>,
    next_seq: u64,
    /// Latest request whose response is displayed.
    applied_seq: Option<u64>,
    /// Latest request that settled either way.
    settled_seq: Option<u64>,
    pub logger: Logger,
}

impl ViewState {
    pub fn new(logger: Logger) -> Self {
        ViewState {
            logger,
            ..Default::default()
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(Logger::new(config.buffer_log_level, config.stderr_log_level))
    }

    pub fn result(&self) -> Option<&ResultView> {
        self.result.as_ref()
    }

    pub fn active_view(&self) -> ActiveView {
        self.active_view
    }

    pub fn replay(&self) -> &Replay {
        &self.replay
    }

    pub fn error(&self) -> Option<&ViewError> {
        self.error.as_ref()
    }

    pub fn select_view(&mut self, view: ActiveView) {
        self.active_view = view;
    }

    pub fn select_step(&mut self, index: usize) -> Option<usize> {
        self.replay.select(index)
    }

    pub fn step_forward(&mut self) -> Option<usize> {
        self.replay.forward()
    }

    pub fn step_back(&mut self) -> Option<usize> {
        self.replay.back()
    }

    pub fn current_step(&self) -> Option<StepView> {
        self.replay.current()
    }

    /// Tag a request before sending it. The grammar of the request decides
    /// symbol kinds when its response is decoded.
    pub fn begin_request(&mut self, request: &ParseRequest) -> RequestTicket {
        self.next_seq += 1;
        RequestTicket {
            seq: self.next_seq,
            issued_at: instant::Instant::now(),
            symbols: request.grammar.symbols(),
        }
    }

    /// Settle a request. A response is dropped when a later request's
    /// response is already displayed; a failure is dropped when any later
    /// request has settled.
    pub fn complete(&mut self, ticket: RequestTicket, result: Result<ParserResponse>) -> Outcome {
        let newer = match &result {
            Ok(_) => self.applied_seq,
            Err(_) => self.settled_seq,
        };
        if newer.is_some_and(|s| s >= ticket.seq) {
            infoln!(self, "dropping stale response for request #{}", ticket.seq);
            return Outcome::Stale;
        }
        self.settled_seq = self.settled_seq.max(Some(ticket.seq));

        match result {
            Ok(response) => {
                self.applied_seq = Some(ticket.seq);
                let view = ResultView::new(response, &ticket.symbols);
                for diag in view.diagnostics() {
                    self.logger.diagnostic(&diag);
                }
                infoln!(
                    self,
                    "request #{} done in {:?}: {} states, {} table entries, {} steps",
                    ticket.seq,
                    ticket.issued_at.elapsed(),
                    view.sets().len(),
                    view.table().num_entries(),
                    view.response().parsing_steps.len()
                );
                self.replay = view.replay();
                self.result = Some(view);
                self.error = None;
                Outcome::Applied
            }
            Err(e) => {
                warn!(self, "request #{} failed: {}", ticket.seq, e);
                self.error = Some(e.clone());
                Outcome::Failed(e)
            }
        }
    }

    /// Validate, send and settle in one go.
    pub fn submit<B: ParseBackend>(&mut self, client: &ParseClient<B>, model: &mut GrammarModel) -> Outcome {
        let request = match model.request() {
            Ok(r) => r,
            Err(e) => return Outcome::Blocked(e),
        };
        let ticket = self.begin_request(&request);
        let result = client.parse(&request);
        self.complete(ticket, result)
    }

    /// Text of the active view, or the error banner when there is no result yet.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(e) = &self.error {
            out.push_str(&format!("Error: {}\n", e));
        }
        if let Some(result) = &self.result {
            out.push_str(&format!("== {} ==\n", self.active_view.title()));
            out.push_str(&result.render(self.active_view, &self.replay));
        }
        out
    }
}
