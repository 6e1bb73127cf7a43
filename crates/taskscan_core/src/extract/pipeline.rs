//! Record assembly over page text.
//!
//! # Responsibility
//! - Find task anchors line by line across pages.
//! - Window the context, run the layout's extractors and expand each anchor
//!   into one or more records.
//!
//! # Invariants
//! - Text without a task-number token yields no records.
//! - Windows span raw page lines, blank lines included; blank lines are
//!   never anchors.
//! - Documentation-only layouts drop anchors without a documentation
//!   reference; every other anchor yields at least one record.
//! - Records come out in page, line and expansion order.

use crate::config::ExtractorConfig;
use crate::extract::fields::{
    extract_ata, extract_description, extract_documentation, extract_limit,
    extract_part_numbers, extract_task_number, PartNumberPair,
};
use crate::extract::profile::{profile, DocumentationMode, LayoutProfile};
use crate::extract::registry::CanonicalRegistry;
use crate::extract::window::ContextWindow;
use crate::model::layout::Layout;
use crate::model::record::TaskRecord;
use log::debug;

/// Counters for one extraction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub pages: usize,
    /// Pages without any text.
    pub empty_pages: usize,
    pub lines: usize,
    pub anchors: usize,
    pub records: usize,
}

/// Result of [`Pipeline::extract_pages`].
#[derive(Debug, Clone)]
pub struct Extraction {
    pub records: Vec<TaskRecord>,
    pub stats: ExtractionStats,
    /// Registry state at the end of the run.
    pub registry: CanonicalRegistry,
}

/// Layout-parameterized extraction engine.
#[derive(Debug, Clone)]
pub struct Pipeline {
    layout: Layout,
    window_size: usize,
    extra_part_numbers: Vec<String>,
    extra_documentation: Vec<String>,
}

impl Pipeline {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            layout: config.layout,
            window_size: config.window_size.max(1),
            extra_part_numbers: config.extra_part_numbers.clone(),
            extra_documentation: config.extra_documentation.clone(),
        }
    }

    /// Pipeline with default settings for `layout`.
    pub fn for_layout(layout: Layout) -> Self {
        Self::new(&ExtractorConfig::for_layout(layout))
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Fresh registry seeded for this pipeline's layout.
    pub fn new_registry(&self) -> CanonicalRegistry {
        let profile = profile(self.layout);
        CanonicalRegistry::seeded(
            profile
                .part_number_seeds()
                .iter()
                .copied()
                .chain(self.extra_part_numbers.iter().map(String::as_str)),
            profile
                .documentation_seeds()
                .iter()
                .copied()
                .chain(self.extra_documentation.iter().map(String::as_str)),
        )
    }

    /// Runs one extraction over `pages` with a freshly seeded registry.
    pub fn extract_pages<S: AsRef<str>>(&self, pages: &[S]) -> Extraction {
        let mut registry = self.new_registry();
        let (records, stats) = self.extract_with_registry(pages, &mut registry);
        Extraction {
            records,
            stats,
            registry,
        }
    }

    /// Runs one extraction folding values into a caller-owned registry.
    pub fn extract_with_registry<S: AsRef<str>>(
        &self,
        pages: &[S],
        registry: &mut CanonicalRegistry,
    ) -> (Vec<TaskRecord>, ExtractionStats) {
        let profile = profile(self.layout);
        let mut records = Vec::new();
        let mut stats = ExtractionStats::default();

        for (page_index, page) in pages.iter().enumerate() {
            stats.pages += 1;
            let lines = page.as_ref().lines().collect::<Vec<_>>();
            let text_lines = lines.iter().filter(|line| !line.trim().is_empty()).count();
            if text_lines == 0 {
                stats.empty_pages += 1;
                continue;
            }
            stats.lines += text_lines;

            for (line_index, line) in lines.iter().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let task_number = extract_task_number(line);
                if task_number.is_empty() {
                    continue;
                }
                stats.anchors += 1;

                let window = ContextWindow::new(&lines, line_index, self.window_size);
                let before = records.len();
                self.assemble(profile, &window, task_number, registry, &mut records);
                debug!(
                    "event=anchor_found module=extract page={} line={} records={}",
                    page_index + 1,
                    window.anchor_index() + 1,
                    records.len() - before
                );
            }
        }

        stats.records = records.len();
        (records, stats)
    }

    fn assemble(
        &self,
        profile: &LayoutProfile,
        window: &ContextWindow<'_>,
        task_number: String,
        registry: &mut CanonicalRegistry,
        out: &mut Vec<TaskRecord>,
    ) {
        let context = window.joined();

        let mut base = TaskRecord::new(task_number, context.clone());
        base.ata = extract_ata(&context);
        base.description = extract_description(&window.lines().join("\n"), profile);
        if profile.has_limit() {
            base.limit = extract_limit(&context);
        }

        let pairs = if profile.has_part_numbers() {
            extract_part_numbers(&context, registry)
        } else {
            Vec::new()
        };

        let documentation = match profile.documentation_mode() {
            DocumentationMode::None => Vec::new(),
            DocumentationMode::Distinct | DocumentationMode::Joined => {
                extract_documentation(&context, profile, registry)
            }
        };

        if documentation.is_empty()
            && !profile.has_part_numbers()
            && profile.documentation_mode() != DocumentationMode::None
        {
            return;
        }

        match profile.documentation_mode() {
            DocumentationMode::Distinct if pairs.is_empty() => {
                for reference in distinct(documentation) {
                    let mut record = base.clone();
                    record.documentation = reference;
                    out.push(record);
                }
                return;
            }
            DocumentationMode::Distinct if !documentation.is_empty() => {
                base.documentation = distinct(documentation).join(" ");
            }
            DocumentationMode::Joined if !documentation.is_empty() => {
                base.documentation = documentation.join(" ");
            }
            _ => {}
        }

        if pairs.is_empty() {
            out.push(base);
            return;
        }
        for PartNumberPair {
            part_number,
            reference_number,
        } in pairs
        {
            let mut record = base.clone();
            record.part_number = part_number;
            record.reference_number = reference_number;
            out.push(record);
        }
    }
}

fn distinct(values: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !unique.contains(&value) {
            unique.push(value);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::Pipeline;
    use crate::config::ExtractorConfig;
    use crate::extract::registry::FieldKind;
    use crate::model::layout::Layout;

    #[test]
    fn text_without_anchor_yields_nothing() {
        let extraction = Pipeline::for_layout(Layout::Tdmplmd)
            .extract_pages(&["Check oil level ALL MP/N\n60 M", ""]);
        assert!(extraction.records.is_empty());
        assert_eq!(extraction.stats.pages, 2);
        assert_eq!(extraction.stats.empty_pages, 1);
        assert_eq!(extraction.stats.anchors, 0);
    }

    #[test]
    fn one_record_per_part_number_pair() {
        let page = "32/11/00/210/801/001 Inspect gear\n2928-2 (A1) 17149-1 (-)\n12 M";
        let extraction = Pipeline::for_layout(Layout::Tdmplm).extract_pages(&[page]);
        let records = extraction.records;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].part_number, "2928-2");
        assert_eq!(records[0].reference_number, "A1");
        assert_eq!(records[1].part_number, "17149-1");
        assert_eq!(records[1].reference_number, "-");
        assert!(records.iter().all(|r| r.limit == "12 M"));
        assert!(records.iter().all(|r| r.documentation == "-"));
    }

    #[test]
    fn distinct_documentation_expands_records() {
        let page = "21/51/10/601/001/001 Check pack CMM 25.69.87\nMET 21.51.10.601";
        let records = Pipeline::for_layout(Layout::Tddm).extract_pages(&[page]).records;
        let docs = records
            .iter()
            .map(|r| r.documentation.as_str())
            .collect::<Vec<_>>();
        assert_eq!(docs, vec!["CMM 25.69.87", "MET 21.51.10.601"]);
        assert!(records.iter().all(|r| r.description == "Check pack"));
        assert!(records.iter().all(|r| r.part_number == "-" && r.limit == "-"));
    }

    #[test]
    fn documentation_layouts_drop_undocumented_anchors() {
        for layout in [Layout::Tddm, Layout::Tddim] {
            let extraction = Pipeline::for_layout(layout)
                .extract_pages(&["21/51/10/601/001/001 Check pack 600 FH"]);
            assert_eq!(extraction.stats.anchors, 1);
            assert!(extraction.records.is_empty(), "layout {layout}");
        }

        let records = Pipeline::for_layout(Layout::Tdmplmd)
            .extract_pages(&["21/51/10/601/001/001 Check pack 2928-2 (A1)"])
            .records;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].documentation, "-");
    }

    #[test]
    fn joined_documentation_keeps_repeats() {
        let page = "21/51/10/601/001/001 Check MET 21.51.10.601\nMET 21.51.10.601";
        let records = Pipeline::for_layout(Layout::Tddim).extract_pages(&[page]).records;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].documentation, "MET 21.51.10.601 MET 21.51.10.601");

        let records = Pipeline::for_layout(Layout::Tddm).extract_pages(&[page]).records;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].documentation, "MET 21.51.10.601");
    }

    #[test]
    fn blank_lines_count_toward_the_window() {
        let page = "21/51/10/601/001/001 Check pack MET 21.51.10.601\n\nline2\n600 FH";
        let extraction = Pipeline::for_layout(Layout::Tddim).extract_pages(&[page]);
        let records = extraction.records;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].reference, "21/51/10/601/001/001 Check pack MET 21.51.10.601  line2");
        assert_eq!(records[0].limit, "-");
        assert_eq!(extraction.stats.lines, 3);
    }

    #[test]
    fn joined_documentation_is_one_cell() {
        let page = "21/51/10/601/001/001 Check MET 21.51.10.601 MET 21.51.10.602 600 FH";
        let records = Pipeline::for_layout(Layout::Tddim).extract_pages(&[page]).records;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].documentation, "MET 21.51.10.601 MET 21.51.10.602");
        assert_eq!(records[0].limit, "600 FH");
        assert_eq!(records[0].ata, "21-51");
    }

    #[test]
    fn window_size_limits_context() {
        let page = "21/51/10/601/001/001 Check MET 21.51.10.601\nline two\nline three 12 M";
        let mut config = ExtractorConfig::for_layout(Layout::Tddim);
        config.window_size = 2;
        let records = Pipeline::new(&config).extract_pages(&[page]).records;
        assert_eq!(
            records[0].reference,
            "21/51/10/601/001/001 Check MET 21.51.10.601 line two"
        );
        assert_eq!(records[0].limit, "-");
    }

    #[test]
    fn extra_seeds_join_the_registry() {
        let mut config = ExtractorConfig::for_layout(Layout::Tdmplm);
        config.extra_part_numbers = vec!["XY123".to_string()];
        let registry = Pipeline::new(&config).new_registry();
        assert!(registry.contains(FieldKind::PartNumber, "XY123"));
        assert!(registry.contains(FieldKind::PartNumber, "BL16600-12"));
        assert_eq!(registry.len(FieldKind::Documentation), 0);
    }
}
