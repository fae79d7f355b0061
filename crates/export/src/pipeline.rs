//! Runs every configured NSS file through its export directives.

use std::path::Path;

use nss_core::logging::{LogCategory, LogSink};
use nss_core::ppu::RgbLookupRegistry;

use crate::config::{Config, NssConfig, RgbLookupConfig};
use crate::directive::{ExportContext, ExportDirective};
use crate::session::Session;

/// Directive outcome counts for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl ExportSummary {
    fn merge(&mut self, other: ExportSummary) {
        self.succeeded += other.succeeded;
        self.failed += other.failed;
    }
}

/// Build the lookup registry from the configured tables.
///
/// Malformed tables are reported and skipped. A table reusing an id that is
/// already registered is ignored with a warning.
pub fn build_lookup_registry(tables: &[RgbLookupConfig], sink: &dyn LogSink) -> RgbLookupRegistry {
    let mut registry = RgbLookupRegistry::default();
    for (i, table) in tables.iter().enumerate() {
        match table.to_lookup() {
            Ok(lookup) => {
                let id = lookup.id().to_string();
                if registry.register(lookup) {
                    sink.info(LogCategory::Config, format!("Registered RGB lookup table {}", id));
                } else {
                    sink.warn(
                        LogCategory::Config,
                        format!("RGB lookup table {} is already defined, ignoring entry {}", id, i),
                    );
                }
            }
            Err(e) => sink.error(
                LogCategory::Config,
                format!("RGB lookup table entry {} is invalid: {}", i, e),
            ),
        }
    }
    registry
}

/// Process every NSS file in `config`. Failures are reported to `sink` and
/// never stop the run.
pub fn run(config: &Config, lookups: &RgbLookupRegistry, sink: &dyn LogSink) -> ExportSummary {
    let mut summary = ExportSummary::default();
    if config.nss_files.is_empty() {
        sink.error(LogCategory::Config, "Config contains no NSSFiles entries".to_string());
        return summary;
    }
    for nss in &config.nss_files {
        summary.merge(process_nss(nss, lookups, sink));
    }
    summary
}

/// Parse one NSS file and run its directives in order.
pub fn process_nss(nss: &NssConfig, lookups: &RgbLookupRegistry, sink: &dyn LogSink) -> ExportSummary {
    let mut summary = ExportSummary::default();
    let Some(source) = nss.source_file.as_deref().filter(|s| !s.trim().is_empty()) else {
        sink.error(
            LogCategory::Session,
            "NSSConfig missing or empty SourceFile attribute".to_string(),
        );
        summary.failed += 1;
        return summary;
    };

    sink.info(LogCategory::Session, format!("Opening NSS file: {}", source));
    let session = match Session::load(Path::new(source)) {
        Ok(session) => session,
        Err(e) => {
            sink.error(LogCategory::Session, format!("Unable to read NSS file {}: {}", source, e));
            summary.failed += 1;
            return summary;
        }
    };
    for name in session.duplicates() {
        sink.warn(
            LogCategory::Session,
            format!("NSS file {} repeats token {}, keeping the first value", source, name),
        );
    }
    sink.info(
        LogCategory::Session,
        format!("Finished parsing NSS file: {} found {} tokens", source, session.len()),
    );

    let ctx = ExportContext {
        source,
        session: &session,
        lookups,
        sink,
    };
    run_all(&ctx, &nss.export_chr, &mut summary);
    run_all(&ctx, &nss.export_palette, &mut summary);
    run_all(&ctx, &nss.export_nametable, &mut summary);
    run_all(&ctx, &nss.export_nametable_attributes, &mut summary);
    run_all(&ctx, &nss.export_bitmap, &mut summary);
    run_all(&ctx, &nss.export_nametable_bitmap, &mut summary);
    summary
}

fn run_all<D: ExportDirective>(ctx: &ExportContext<'_>, directives: &[D], summary: &mut ExportSummary) {
    for directive in directives {
        match directive.export(ctx) {
            Ok(()) => summary.succeeded += 1,
            Err(e) => {
                ctx.sink.error(
                    LogCategory::Export,
                    format!(
                        "NSS file {}, {} export to {}: {}",
                        ctx.source,
                        D::KIND,
                        directive.target_file().unwrap_or("<none>"),
                        e
                    ),
                );
                summary.failed += 1;
            }
        }
    }
}
