use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::{SplitConfig, DEFAULT_CHUNK_SIZE};
use crate::model::{size_kb, SourceDocument};
use crate::partition::{part_file_name, plan, resolve_chunk_size, SplitPlan};
use crate::queue::SplitQueue;
use crate::session::Splitter;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfPlanRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Pages per part (default: the page count, i.e. no split)")]
    #[serde(default)]
    pub pages: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfSplitRequest {
    #[schemars(description = "Paths of the PDF files to split, processed in order")]
    pub paths: Vec<String>,
    #[schemars(description = "Directory in which a timestamped session folder is created")]
    pub output_dir: String,
    #[schemars(description = "Pages per part for every file (default: 20 when invalid)")]
    #[serde(default)]
    pub pages: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Get the file name, size in KB and page count of a PDF")]
    fn pdf_info(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        match SourceDocument::read(&path) {
            Ok(doc) => {
                let result = PdfInfoResult {
                    file_name: doc.file_name(),
                    path,
                    size_kb: size_kb(doc.size_bytes),
                    page_count: doc.total_pages,
                };
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {:#}", e),
        }
    }

    #[tool(description = "Show the page ranges and output file names a split would produce, without writing anything")]
    fn pdf_plan(&self, Parameters(req): Parameters<PdfPlanRequest>) -> String {
        let doc = match SourceDocument::read(&req.path) {
            Ok(d) => d,
            Err(e) => return format!("Error: {:#}", e),
        };
        let input = req
            .pages
            .unwrap_or_else(|| doc.total_pages.to_string());
        let chunk_size = resolve_chunk_size(&input, DEFAULT_CHUNK_SIZE);

        let parts = match plan(doc.total_pages, chunk_size) {
            SplitPlan::Unsplit => Vec::new(),
            SplitPlan::Parts(spans) => {
                let base_name = doc.base_name();
                spans
                    .iter()
                    .enumerate()
                    .map(|(index, span)| PlannedPart {
                        file_name: part_file_name(&base_name, index + 1),
                        first_page: span.start + 1,
                        last_page: span.end,
                    })
                    .collect()
            }
        };

        let result = PlanResult {
            path: req.path,
            page_count: doc.total_pages,
            chunk_size: chunk_size.get(),
            unsplit: parts.is_empty(),
            parts,
        };
        serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
    }

    #[tool(description = "Split PDFs into parts of N pages, written to a new timestamped folder inside output_dir. Returns a per-file report; one file failing does not stop the others.")]
    fn pdf_split(&self, Parameters(req): Parameters<PdfSplitRequest>) -> String {
        let mut queue = SplitQueue::new();
        for path in &req.paths {
            // Unreadable files stay queued and come back as failed documents
            let _ = queue.add(path);
        }
        if let Some(pages) = &req.pages {
            queue.set_all_chunk_inputs(pages);
        }

        let splitter = Splitter::new(SplitConfig::default());
        match splitter.run(&queue, PathBuf::from(&req.output_dir), chrono::Local::now()) {
            Ok(report) => {
                serde_json::to_string_pretty(&report).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PdfInfoResult {
    pub path: String,
    pub file_name: String,
    pub size_kb: f64,
    pub page_count: u32,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PlannedPart {
    pub file_name: String,
    pub first_page: u32,
    pub last_page: u32,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PlanResult {
    pub path: String,
    pub page_count: u32,
    pub chunk_size: u32,
    pub unsplit: bool,
    pub parts: Vec<PlannedPart>,
}

impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF splitting tools. Use pdf_info to get a file's size and page count, \
                 pdf_plan to preview the parts a split would produce, and pdf_split to \
                 write the parts into a timestamped folder."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PdfServer::new();

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
