//! # Reference Subcommands
//!
//! Browse the reference pack in use: the NCM catalog (`icmsst ncm`) and
//! the UF internal-rate table (`icmsst uf`). Both honour `--pack`.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use icmsst_core::{NcmCode, UfCode};
use serde::Serialize;

use crate::report::{render_ncm_entry, render_uf_entry};
use crate::Context;

/// Arguments for the `icmsst ncm` subcommand.
#[derive(Args, Debug)]
pub struct NcmArgs {
    #[command(subcommand)]
    pub command: NcmCommand,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum NcmCommand {
    /// List every catalog entry.
    List,
    /// Show one entry.
    Show { code: String },
    /// Match a code prefix (`8708`) or description text (`pneus`).
    Search { query: String },
}

/// Arguments for the `icmsst uf` subcommand.
#[derive(Args, Debug)]
pub struct UfArgs {
    #[command(subcommand)]
    pub command: UfCommand,

    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum UfCommand {
    /// List every state with its internal rate.
    List,
    /// Show one state.
    Show { code: String },
}

fn render<T: Serialize>(rows: &[T], json: bool, line: impl Fn(&T) -> String) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(rows)?);
    }
    Ok(rows.iter().map(line).collect::<Vec<_>>().join("\n"))
}

pub fn ncm_output(args: &NcmArgs, ctx: &Context) -> Result<String> {
    let catalog = &ctx.pack.ncm;
    let rows = match &args.command {
        NcmCommand::List => catalog.iter().collect::<Vec<_>>(),
        NcmCommand::Show { code } => {
            let code = NcmCode::new(code)?;
            match catalog.get(&code) {
                Some(entry) => vec![entry],
                None => bail!("NCM {} is not in the catalog", code.dotted()),
            }
        }
        NcmCommand::Search { query } => {
            let found = catalog.search(query);
            tracing::debug!(query = %query, matches = found.len(), "ncm search");
            found
        }
    };
    render(&rows, args.json, |e| render_ncm_entry(e))
}

pub fn uf_output(args: &UfArgs, ctx: &Context) -> Result<String> {
    let table = &ctx.pack.uf;
    let rows = match &args.command {
        UfCommand::List => table.iter().collect::<Vec<_>>(),
        UfCommand::Show { code } => {
            let code = UfCode::new(code)?;
            match table.get(&code) {
                Some(entry) => vec![entry],
                None => bail!("UF {code} is not in the reference table"),
            }
        }
    };
    render(&rows, args.json, |e| render_uf_entry(e))
}

/// Execute the ncm subcommand. A search with no matches exits 1.
pub fn run_ncm(args: &NcmArgs, ctx: &Context) -> Result<u8> {
    let out = ncm_output(args, ctx)?;
    if out.is_empty() {
        eprintln!("no matching NCM codes");
        return Ok(1);
    }
    println!("{out}");
    Ok(0)
}

/// Execute the uf subcommand.
pub fn run_uf(args: &UfArgs, ctx: &Context) -> Result<u8> {
    println!("{}", uf_output(args, ctx)?);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use icmsst_pack::ReferencePack;

    #[derive(Parser)]
    struct NcmHarness {
        #[command(flatten)]
        args: NcmArgs,
    }

    #[derive(Parser)]
    struct UfHarness {
        #[command(flatten)]
        args: UfArgs,
    }

    fn ncm(argv: &[&str], ctx: &Context) -> Result<String> {
        let mut full = vec!["icmsst"];
        full.extend_from_slice(argv);
        ncm_output(&NcmHarness::parse_from(full).args, ctx)
    }

    fn uf(argv: &[&str]) -> Result<String> {
        let mut full = vec!["icmsst"];
        full.extend_from_slice(argv);
        uf_output(&UfHarness::parse_from(full).args, &Context::default())
    }

    #[test]
    fn search_by_prefix() {
        let text = ncm(&["search", "8708"], &Context::default()).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().all(|l| l.starts_with("8708.")));
    }

    #[test]
    fn search_by_description_as_json() {
        let text = ncm(&["search", "pneus", "--json"], &Context::default()).unwrap();
        let rows: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 1);
        assert_eq!(rows[0]["code"], "4011.10.00");
    }

    #[test]
    fn search_without_matches_is_empty() {
        assert_eq!(ncm(&["search", "xyzzy"], &Context::default()).unwrap(), "");
    }

    #[test]
    fn show_unknown_code_is_an_error() {
        let err = ncm(&["show", "0000.00.00"], &Context::default()).unwrap_err();
        assert!(err.to_string().contains("0000.00.00"));
    }

    #[test]
    fn list_reads_operator_pack() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pack.yaml");
        std::fs::write(
            &path,
            "ncm:\n  - code: \"1234.56.78\"\n    description: Produto de teste\n    mva: \"50\"\n",
        )
        .unwrap();
        let ctx = Context {
            pack: ReferencePack::from_path(&path).unwrap(),
            ..Context::default()
        };
        let text = ncm(&["list"], &ctx).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("Produto de teste"));
    }

    #[test]
    fn uf_list_and_show() {
        assert_eq!(uf(&["list"]).unwrap().lines().count(), 27);
        assert_eq!(uf(&["show", "sp"]).unwrap(), "SP   18,00%  São Paulo");
        assert!(uf(&["show", "ZZ"]).is_err());
    }
}
