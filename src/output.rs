use std::io::{self, Write};

use serde::Serialize;

use crate::app::{ProgressEvent, ProgressSink, SearchOutcome, UploadResult};
use crate::gateway::document_url;

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Interactive,
    NonInteractive,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_search(outcome: &SearchOutcome) -> io::Result<()> {
        Self::print_json(outcome)
    }

    pub fn print_upload(result: &UploadResult) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

pub struct ConsoleOutput;

impl ProgressSink for ConsoleOutput {
    fn event(&self, event: ProgressEvent) {
        eprintln!("{}", event.message);
    }
}

pub fn print_search_results(outcome: &SearchOutcome, gateway_url: &str) {
    let green = "\x1b[32m";
    let yellow = "\x1b[33m";
    let cyan = "\x1b[36m";
    let red = "\x1b[31m";
    let reset = "\x1b[0m";

    let papers = match outcome {
        SearchOutcome::Unavailable { reason } => {
            println!("{red}❌ Cannot load paper index: {reason}{reset}");
            return;
        }
        SearchOutcome::Loaded(papers) => papers,
    };

    if papers.is_empty() {
        println!("{yellow}No matching papers found{reset}");
        return;
    }

    println!("{cyan}🔎 Found {} paper(s){reset}", papers.len());
    for paper in papers {
        println!(
            "\n{cyan}📄 {}{reset}",
            paper.title.as_deref().unwrap_or("No title available")
        );
        println!(
            "   DOI: {}",
            paper.doi.as_deref().unwrap_or("No DOI available")
        );
        println!(
            "   arXiv ID: {}",
            paper.aid.as_deref().unwrap_or("No arXiv ID available")
        );
        println!(
            "   Transaction ID: {}",
            paper.tx_id.as_deref().unwrap_or("No TX ID available")
        );
        println!(
            "   Authors: {}",
            paper.authors.as_deref().unwrap_or("No authors available")
        );
        println!(
            "   Abstract: {}",
            paper
                .abstract_text
                .as_deref()
                .unwrap_or("No abstract available")
        );
        match &paper.pdf_id {
            Some(pdf_id) => {
                println!(
                    "   {green}View PDF: {}{reset}",
                    document_url(gateway_url, pdf_id)
                );
            }
            None => println!("   {yellow}PDF not available{reset}"),
        }
    }
}

pub fn print_upload_summary(result: &UploadResult) {
    let green = "\x1b[32m";
    let yellow = "\x1b[33m";
    let cyan = "\x1b[36m";
    let reset = "\x1b[0m";

    let succeeded: usize = result.chunks.iter().map(|chunk| chunk.succeeded).sum();
    let failed: usize = result.chunks.iter().map(|chunk| chunk.failed).sum();

    println!("{cyan}✨ scivault upload summary{reset}");
    println!("{green}✅ Uploaded: {succeeded}{reset}");
    println!("{yellow}⚠️ Failed: {failed}{reset}");
    for chunk in &result.chunks {
        println!(
            "{cyan}📊 chunk_{}.json: {} ok, {} failed, {}% success{reset}",
            chunk.chunk, chunk.succeeded, chunk.failed, chunk.success_rate
        );
    }
}
