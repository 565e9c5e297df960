use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use log::{debug, info, warn};

use crate::color::Color;
use crate::error::{IngestError, ParseError};
use crate::parser::{GeometryDecoder, LineGeometryParser, ParseReport, ParserConfig, WktDecoder};
use crate::registry::LayerRegistry;
use crate::style::StyleBuilder;

/// Asks the user for a stroke and a fill color, blocking until they confirm or cancel.
///
/// Returns `None` if the user cancelled.
pub trait StyleChooser {
    fn choose_colors(&mut self) -> Option<(Color, Color)>;
}

impl<F> StyleChooser for F
where
    F: FnMut() -> Option<(Color, Color)>,
{
    fn choose_colors(&mut self) -> Option<(Color, Color)> {
        self()
    }
}

/// State shared by the workflow and the presentation layer, constructed once at startup.
#[derive(Debug)]
pub struct AppContext {
    registry: LayerRegistry,
    parser_config: ParserConfig,
    open: AtomicBool,
}

impl AppContext {
    pub fn new(parser_config: ParserConfig) -> Self {
        Self {
            registry: LayerRegistry::new(),
            parser_config,
            open: AtomicBool::new(true),
        }
    }

    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    pub fn parser_config(&self) -> &ParserConfig {
        &self.parser_config
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Any parse still in flight will have its result discarded.
    pub fn close(&self) {
        info!("Session closed");
        self.open.store(false, Ordering::Release);
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    pub layer_index: usize,
    pub layer_name: String,
    pub success_count: usize,
    pub failure_count: usize,
    pub failed_lines: Vec<String>,
}

impl IngestOutcome {
    /// If `true` the caller should tell the user how many lines were invalid.
    pub fn has_failures(&self) -> bool {
        self.failure_count > 0
    }
}

/// A parse running on a background thread.
#[derive(Debug)]
pub struct PendingParse {
    path: PathBuf,
    receiver: Receiver<Result<ParseReport, ParseError>>,
}

impl PendingParse {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking, for polling from a frame loop. Returns the result at most once.
    pub fn try_take(&self) -> Option<Result<ParseReport, IngestError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result.map_err(IngestError::from)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(IngestError::WorkerFailed(format!(
                "no result for '{}'",
                self.path.display()
            )))),
        }
    }

    /// Blocks until the background parse has finished.
    pub fn wait(&self) -> Result<ParseReport, IngestError> {
        match self.receiver.recv() {
            Ok(result) => Ok(result?),
            Err(_) => Err(IngestError::WorkerFailed(format!(
                "no result for '{}'",
                self.path.display()
            ))),
        }
    }
}

/// Validates, parses, styles and registers text files of geometries.
///
/// Parsing happens on a background thread, style selection and registration on the calling thread.
pub struct IngestionWorkflow<D = WktDecoder> {
    context: Arc<AppContext>,
    parser: Arc<LineGeometryParser<D>>,
}

impl IngestionWorkflow<WktDecoder> {
    pub fn new(context: Arc<AppContext>) -> Self {
        let parser = LineGeometryParser::new(context.parser_config().clone());
        Self::with_parser(context, parser)
    }
}

impl<D: GeometryDecoder + 'static> IngestionWorkflow<D> {
    pub fn with_parser(context: Arc<AppContext>, parser: LineGeometryParser<D>) -> Self {
        Self {
            context,
            parser: Arc::new(parser),
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Parses the file, asks for a style and adds the layer.
    ///
    /// Lines which could not be decoded do not fail the operation, they are reported in the outcome. A file
    /// without any valid geometry still results in an (empty) layer.
    ///
    /// Blocks the calling thread until the background parse has finished. A UI frame loop should call
    /// [`Self::spawn_parse`], poll [`PendingParse::try_take`] each frame and then call [`Self::register`].
    pub fn add_layer_from_file<C>(&self, path: impl AsRef<Path>, chooser: &mut C) -> Result<IngestOutcome, IngestError>
    where
        C: StyleChooser + ?Sized,
    {
        let pending = self.spawn_parse(path)?;
        self.complete(pending, chooser)
    }

    /// Validates the file on the calling thread, then parses it on a background thread.
    pub fn spawn_parse(&self, path: impl AsRef<Path>) -> Result<PendingParse, IngestError> {
        let path = path.as_ref().to_path_buf();
        self.parser.validate_file(&path)?;

        let (sender, receiver) = mpsc::channel();
        let parser = self.parser.clone();
        let thread_path = path.clone();

        thread::Builder::new()
            .name("wkt-parse".to_string())
            .spawn(move || {
                let result = parser.parse(&thread_path);
                if sender.send(result).is_err() {
                    debug!("Parse result for '{}' dropped, receiver gone", thread_path.display());
                }
            })
            .map_err(|error| IngestError::WorkerFailed(error.to_string()))?;

        debug!("Spawned parse. path: '{}'", path.display());

        Ok(PendingParse {
            path,
            receiver,
        })
    }

    /// Waits for the parse, then asks for a style and registers the layer.
    pub fn complete<C>(&self, pending: PendingParse, chooser: &mut C) -> Result<IngestOutcome, IngestError>
    where
        C: StyleChooser + ?Sized,
    {
        let report = pending.wait()?;
        self.register(pending.path(), report, chooser)
    }

    /// Asks for a style and registers a finished parse, nothing is added if the user cancels.
    pub fn register<C>(&self, path: &Path, report: ParseReport, chooser: &mut C) -> Result<IngestOutcome, IngestError>
    where
        C: StyleChooser + ?Sized,
    {
        self.ensure_open(path)?;

        let (stroke_color, fill_color) = chooser.choose_colors().ok_or_else(|| {
            info!("Style selection cancelled. path: '{}'", path.display());
            IngestError::UserCancelled
        })?;

        // the session may have been closed while the user was choosing
        self.ensure_open(path)?;

        let style = StyleBuilder::build_style(stroke_color, fill_color);
        let success_count = report.success_count();
        let failure_count = report.failure_count();
        let (features, failed_lines) = report.into_parts();

        let layer_name = layer_name(path);
        let layer_index = self
            .context
            .registry()
            .add_named_layer(layer_name.clone(), features, style)?;

        if failure_count > 0 {
            warn!(
                "Layer '{}' added with invalid lines. valid: {}, invalid: {}",
                layer_name, success_count, failure_count
            );
        }

        Ok(IngestOutcome {
            layer_index,
            layer_name,
            success_count,
            failure_count,
            failed_lines,
        })
    }

    fn ensure_open(&self, path: &Path) -> Result<(), IngestError> {
        if self.context.is_open() {
            return Ok(());
        }
        warn!("Discarding parse result, session closed. path: '{}'", path.display());
        Err(IngestError::SessionClosed)
    }
}

fn layer_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::{write_wkt_fixture, ScriptedStyleChooser};
    use crate::types::GeometryKind;

    fn workflow() -> IngestionWorkflow {
        IngestionWorkflow::new(Arc::new(AppContext::default()))
    }

    #[test]
    fn test_layer_added_with_outcome() {
        let directory = tempfile::tempdir().expect("tempdir");
        let path = write_wkt_fixture(directory.path(), "roads.txt", &["POINT (1 2)", "garbage", "LINESTRING (0 0, 1 1)"]);
        let workflow = workflow();
        let mut chooser = ScriptedStyleChooser::confirming(Color::BLACK, Color::GRAY);

        let outcome = workflow
            .add_layer_from_file(&path, &mut chooser)
            .expect("outcome");

        assert_eq!(outcome.layer_index, 0);
        assert_eq!(outcome.layer_name, "roads");
        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.failure_count, 1);
        assert_eq!(outcome.failed_lines, vec!["garbage".to_string()]);
        assert!(outcome.has_failures());

        let layer = workflow
            .context()
            .registry()
            .layer(0)
            .expect("layer");
        assert_eq!(layer.features().len(), 2);
        assert!(layer
            .style()
            .rule_for(GeometryKind::Polygon)
            .is_some());
    }

    #[test]
    fn test_cancel_leaves_registry_unchanged() {
        let directory = tempfile::tempdir().expect("tempdir");
        let path = write_wkt_fixture(directory.path(), "roads.txt", &["POINT (1 2)"]);
        let workflow = workflow();
        let mut chooser = ScriptedStyleChooser::cancelling();

        let result = workflow.add_layer_from_file(&path, &mut chooser);

        assert!(matches!(result, Err(IngestError::UserCancelled)));
        assert_eq!(workflow.context().registry().layer_count(), 0);
        assert_eq!(chooser.calls(), 1);
    }

    #[test]
    fn test_invalid_input_fails_before_style_choice() {
        let directory = tempfile::tempdir().expect("tempdir");
        let path = write_wkt_fixture(directory.path(), "roads.csv", &["POINT (1 2)"]);
        let workflow = workflow();
        let mut chooser = ScriptedStyleChooser::confirming(Color::BLACK, Color::GRAY);

        let result = workflow.add_layer_from_file(&path, &mut chooser);

        assert!(matches!(result, Err(IngestError::Parse(ParseError::InvalidInput { .. }))));
        assert_eq!(chooser.calls(), 0);
        assert_eq!(workflow.context().registry().layer_count(), 0);
    }

    #[test]
    fn test_only_invalid_lines_still_adds_empty_layer() {
        let directory = tempfile::tempdir().expect("tempdir");
        let path = write_wkt_fixture(directory.path(), "junk.txt", &["junk", "more junk"]);
        let workflow = workflow();

        let outcome = workflow
            .add_layer_from_file(&path, &mut || Some((Color::BLACK, Color::GRAY)))
            .expect("outcome");

        assert_eq!(outcome.success_count, 0);
        assert_eq!(outcome.failure_count, 2);
        let layer = workflow
            .context()
            .registry()
            .layer(outcome.layer_index)
            .expect("layer");
        assert!(layer.is_empty());
    }

    #[test]
    fn test_closed_session_discards_result() {
        let directory = tempfile::tempdir().expect("tempdir");
        let path = write_wkt_fixture(directory.path(), "roads.txt", &["POINT (1 2)"]);
        let workflow = workflow();
        let mut chooser = ScriptedStyleChooser::confirming(Color::BLACK, Color::GRAY);

        let pending = workflow
            .spawn_parse(&path)
            .expect("spawn");
        workflow.context().close();
        let result = workflow.complete(pending, &mut chooser);

        assert!(matches!(result, Err(IngestError::SessionClosed)));
        assert_eq!(chooser.calls(), 0);
        assert_eq!(workflow.context().registry().layer_count(), 0);
    }

    #[test]
    fn test_session_closed_during_style_choice() {
        let directory = tempfile::tempdir().expect("tempdir");
        let path = write_wkt_fixture(directory.path(), "roads.txt", &["POINT (1 2)"]);
        let context = Arc::new(AppContext::default());
        let workflow = IngestionWorkflow::new(context.clone());

        let result = workflow.add_layer_from_file(&path, &mut || {
            context.close();
            Some((Color::BLACK, Color::GRAY))
        });

        assert!(matches!(result, Err(IngestError::SessionClosed)));
        assert_eq!(workflow.context().registry().layer_count(), 0);
    }

    #[test]
    fn test_poll_pending_parse() {
        let directory = tempfile::tempdir().expect("tempdir");
        let path = write_wkt_fixture(directory.path(), "roads.txt", &["POINT (1 2)", "POINT (3 4)"]);
        let workflow = workflow();

        let pending = workflow
            .spawn_parse(&path)
            .expect("spawn");

        let mut report = None;
        for _ in 0..500 {
            if let Some(result) = pending.try_take() {
                report = Some(result.expect("report"));
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        let report = report.expect("parse finished");
        assert_eq!(report.success_count(), 2);

        let outcome = workflow
            .register(pending.path(), report, &mut || Some((Color::WHITE, Color::BLACK)))
            .expect("outcome");
        assert_eq!(outcome.layer_index, 0);
    }

    #[test]
    fn test_sequential_ingests_get_sequential_indices() {
        let directory = tempfile::tempdir().expect("tempdir");
        let first = write_wkt_fixture(directory.path(), "first.txt", &["POINT (1 2)"]);
        let second = write_wkt_fixture(directory.path(), "second.txt", &["POINT (3 4)"]);
        let workflow = workflow();
        let mut chooser = || Some((Color::BLACK, Color::GRAY));

        let first_outcome = workflow
            .add_layer_from_file(&first, &mut chooser)
            .expect("first");
        let second_outcome = workflow
            .add_layer_from_file(&second, &mut chooser)
            .expect("second");

        assert_eq!(first_outcome.layer_index, 0);
        assert_eq!(second_outcome.layer_index, 1);
        assert_eq!(second_outcome.layer_name, "second");
    }
}
