// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use rootfit_config::OutputFormat;
use rootfit_solver::Reconstruction;
use std::fmt::Write;

pub fn render(result: &Reconstruction, format: OutputFormat, precision: usize) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(&result.coefficients, precision)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)? + "\n"),
    }
}

fn render_text(coefficients: &[f64], precision: usize) -> String {
    let mut out = String::from("Polynomial Coefficients:\n");
    for (i, c) in coefficients.iter().enumerate() {
        let _ = writeln!(out, "a{} = {:.*}", i, precision, c);
    }
    out
}
