//! Catalog of curated tools and AI apps, and name-based filtering over it.

use crate::error::{HubError, HubResult};
use crate::matcher::matches;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

// ============================================================================
// Catalog Types
// ============================================================================

/// Which catalog section an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    /// Websites and productivity tools (labels are "tags")
    Tool,
    /// AI applications (labels are "scenarios")
    AiApp,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Tool => "tool",
            EntryKind::AiApp => "ai-app",
        }
    }

    /// What the label list is called for this kind
    pub fn label_name(&self) -> &'static str {
        match self {
            EntryKind::Tool => "tags",
            EntryKind::AiApp => "scenarios",
        }
    }

    /// Section heading shown above the listing
    pub fn section_title(&self) -> &'static str {
        match self {
            EntryKind::Tool => "实用工具",
            EntryKind::AiApp => "AI 专区",
        }
    }
}

/// A single listed tool or AI app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique within its section
    pub id: String,

    pub name: String,

    pub url: String,

    /// One-line description
    #[serde(default)]
    pub description: String,

    /// Tags (tools) or scenarios (AI apps), in display order
    #[serde(default, alias = "tags", alias = "scenarios")]
    pub labels: Vec<String>,
}

impl CatalogEntry {
    pub fn new(id: &str, name: &str, url: &str, description: &str, labels: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            url: url.to_string(),
            description: description.to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// Both catalog sections, immutable once built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub tools: Vec<CatalogEntry>,

    #[serde(default)]
    pub ai_apps: Vec<CatalogEntry>,
}

/// Entries of each section that matched a query
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults<'a> {
    pub query: String,
    pub tools: Vec<&'a CatalogEntry>,
    pub ai_apps: Vec<&'a CatalogEntry>,
}

impl SearchResults<'_> {
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty() && self.ai_apps.is_empty()
    }
}

// ============================================================================
// Filtering
// ============================================================================

/// Entries whose name matches `query`, in their original order.
///
/// Only `name` is consulted; description and labels are never searched.
pub fn filter_by_name<'a>(entries: &'a [CatalogEntry], query: &str) -> Vec<&'a CatalogEntry> {
    entries.iter().filter(|e| matches(query, &e.name)).collect()
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids within a section
    pub fn new(tools: Vec<CatalogEntry>, ai_apps: Vec<CatalogEntry>) -> HubResult<Self> {
        let catalog = Self { tools, ai_apps };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn section(&self, kind: EntryKind) -> &[CatalogEntry] {
        match kind {
            EntryKind::Tool => &self.tools,
            EntryKind::AiApp => &self.ai_apps,
        }
    }

    pub fn len(&self) -> usize {
        self.tools.len() + self.ai_apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Filter both sections by name. The search term is trimmed as submitted.
    pub fn search(&self, query: &str) -> SearchResults<'_> {
        let query = query.trim();
        let results = SearchResults {
            query: query.to_string(),
            tools: filter_by_name(&self.tools, query),
            ai_apps: filter_by_name(&self.ai_apps, query),
        };
        debug!(
            "Search {:?}: {} tools, {} ai apps",
            query,
            results.tools.len(),
            results.ai_apps.len()
        );
        results
    }

    fn validate(&self) -> HubResult<()> {
        for kind in [EntryKind::Tool, EntryKind::AiApp] {
            let mut seen = HashSet::new();
            for entry in self.section(kind) {
                if !seen.insert(entry.id.as_str()) {
                    return Err(HubError::DuplicateEntryId {
                        section: kind.as_str(),
                        id: entry.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load a catalog from a JSON file (`{"tools": [...], "aiApps": [...]}`)
pub fn load_catalog(path: &Path) -> HubResult<Catalog> {
    let content = fs::read_to_string(path).map_err(|e| HubError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let catalog: Catalog = serde_json::from_str(&content).map_err(|e| HubError::FileParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    catalog.validate()?;

    debug!("Loaded {} catalog entries from {:?}", catalog.len(), path);
    Ok(catalog)
}

/// The catalog shipped with the directory page
pub fn builtin_catalog() -> Catalog {
    Catalog {
        tools: vec![
            CatalogEntry::new(
                "1",
                "Notion",
                "https://www.notion.so",
                "文档与知识库协作工具，适合团队沉淀资料与项目管理。",
                &["知识库", "协作"],
            ),
            CatalogEntry::new(
                "2",
                "Canva",
                "https://www.canva.com",
                "快速制作海报、PPT 与社媒图片，适合非设计人员。",
                &["设计", "效率"],
            ),
            CatalogEntry::new(
                "3",
                "Excalidraw",
                "https://excalidraw.com",
                "手绘风流程图与草图工具，适合快速梳理思路。",
                &["流程图", "脑图"],
            ),
            CatalogEntry::new(
                "4",
                "Regex101",
                "https://regex101.com",
                "正则表达式在线调试与解释工具，开发必备。",
                &["开发", "调试"],
            ),
            CatalogEntry::new(
                "5",
                "象限图生成器",
                "https://elysiatools.com/zh/tools/quadrant-chart",
                "企业级团队文档与知识库，适合规范化沉淀流程、产品/研发文档与权限管理。",
                &["四象限图", "数据分析"],
            ),
        ],
        ai_apps: vec![
            CatalogEntry::new(
                "1",
                "Perplexity",
                "https://www.perplexity.ai",
                "带引用的 AI 搜索与问答工具，适合资料查询与快速研究。",
                &["资料检索", "研究", "写作"],
            ),
            CatalogEntry::new(
                "2",
                "ChatGPT",
                "https://chat.openai.com",
                "通用型 AI 助手，支持问答、写作、总结与代码辅助。",
                &["问答", "写作", "编程"],
            ),
            CatalogEntry::new(
                "3",
                "Midjourney",
                "https://www.midjourney.com",
                "高质量 AI 图像生成工具，适合创意设计与视觉探索。",
                &["设计", "视觉", "创意"],
            ),
            CatalogEntry::new(
                "4",
                "Zapier AI",
                "https://zapier.com",
                "自动化工作流工具，结合 AI 实现多应用联动。",
                &["自动化", "效率", "工作流"],
            ),
        ],
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn names(entries: &[&CatalogEntry]) -> Vec<String> {
        entries.iter().map(|e| e.name.clone()).collect()
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let catalog = builtin_catalog();
        let filtered = filter_by_name(&catalog.tools, "");
        let expected: Vec<&CatalogEntry> = catalog.tools.iter().collect();
        assert_eq!(filtered, expected);
    }

    #[test]
    fn test_filter_preserves_relative_order() {
        let entries = vec![
            CatalogEntry::new("a", "Alpha Notes", "https://a", "", &[]),
            CatalogEntry::new("b", "Beta", "https://b", "", &[]),
            CatalogEntry::new("c", "Notebook", "https://c", "", &[]),
        ];
        let filtered = filter_by_name(&entries, "note");
        assert_eq!(names(&filtered), vec!["Alpha Notes", "Notebook"]);
    }

    #[test]
    fn test_only_name_is_searched() {
        let catalog = builtin_catalog();
        // "知识库" appears in Notion's description and tags, not its name
        assert!(filter_by_name(&catalog.tools, "知识库").is_empty());
        // "研究" is a Perplexity scenario
        assert!(filter_by_name(&catalog.ai_apps, "研究").is_empty());
    }

    #[test]
    fn test_search_filters_both_sections() {
        let catalog = builtin_catalog();
        let results = catalog.search("  ai ");
        assert_eq!(results.query, "ai");
        // subsequence hit: exc-A-l-I-draw
        assert_eq!(names(&results.tools), vec!["Excalidraw"]);
        assert_eq!(names(&results.ai_apps), vec!["Zapier AI"]);
    }

    #[test]
    fn test_search_no_hits() {
        let catalog = builtin_catalog();
        let results = catalog.search("zzz");
        assert!(results.is_empty());
    }

    #[test]
    fn test_search_does_not_mutate_catalog() {
        let catalog = builtin_catalog();
        let before = catalog.clone();
        for q in ["", "no", "gpt", "象限", "zzz"] {
            let _ = catalog.search(q);
        }
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let dup = vec![
            CatalogEntry::new("1", "One", "https://1", "", &[]),
            CatalogEntry::new("1", "Uno", "https://1", "", &[]),
        ];
        let err = Catalog::new(dup, vec![]).unwrap_err();
        assert!(matches!(err, HubError::DuplicateEntryId { section: "tool", .. }));
    }

    #[test]
    fn test_same_id_across_sections_is_fine() {
        let catalog = builtin_catalog();
        assert!(Catalog::new(catalog.tools, catalog.ai_apps).is_ok());
    }

    #[test]
    fn test_load_catalog_accepts_label_aliases() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "tools": [{{"id": "1", "name": "Regex101", "url": "https://regex101.com", "tags": ["开发"]}}],
                "aiApps": [{{"id": "1", "name": "ChatGPT", "url": "https://chat.openai.com", "scenarios": ["问答", "写作"]}}]
            }}"#
        )
        .unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.tools[0].labels, vec!["开发"]);
        assert_eq!(catalog.ai_apps[0].labels, vec!["问答", "写作"]);
        assert_eq!(catalog.ai_apps[0].description, "");
    }

    #[test]
    fn test_load_catalog_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_catalog(file.path()).unwrap_err();
        assert!(matches!(err, HubError::FileParse { .. }));
    }

    #[test]
    fn test_load_catalog_missing_file() {
        let err = load_catalog(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, HubError::FileRead { .. }));
    }
}
