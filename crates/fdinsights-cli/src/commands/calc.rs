//! Calculation command implementation

use anyhow::{bail, Result};
use fdinsights_core::{calculate, format_inr, CalculationResult, ValidParameters};

use super::print_validation_errors;
use crate::cli::FdArgs;

/// Calculate and print maturity amount and total interest
pub fn cmd_calc(args: &FdArgs, json: bool) -> Result<()> {
    let params = match args.to_input().validate() {
        Ok(params) => params,
        Err(errors) => {
            print_validation_errors(&errors);
            bail!("Invalid input.");
        }
    };

    let result = calculate(&params);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_summary(&params, &result));
    }

    Ok(())
}

/// Human-readable calculation summary
pub(crate) fn render_summary(params: &ValidParameters, result: &CalculationResult) -> String {
    let frequency = params.compounding_frequency();
    let mut out = String::new();
    out.push_str("💰 Fixed Deposit Summary\n\n");
    out.push_str(&format!("   FD amount:        {}\n", format_inr(params.principal())));
    out.push_str(&format!("   Interest rate:    {}% p.a.\n", params.annual_rate()));
    out.push_str(&format!("   Period:           {} years\n", params.term_years()));
    out.push_str(&format!(
        "   Compounding:      {} ({}x per year)\n",
        frequency.label(),
        frequency.periods_per_year()
    ));
    out.push('\n');
    out.push_str(&format!("   Maturity amount:  {}\n", format_inr(result.maturity_amount)));
    out.push_str(&format!("   Total interest:   {}\n", format_inr(result.total_interest)));
    out
}
