use crate::state::AppState;
use clap::Args;
use okpay_core::currency::convert;
use okpay_sdk::objects::{CurrencyInfo, REFERENCE_CURRENCY, SUPPORTED_CURRENCIES};

#[derive(Args, Debug)]
pub struct RatesArgs {
    /// Amount to convert; prints the rate table when absent
    #[arg(long, requires = "from")]
    pub amount: Option<f64>,

    /// Currency `amount` is given in
    #[arg(long)]
    pub from: Option<String>,

    /// Currency to convert into
    #[arg(long, default_value = REFERENCE_CURRENCY)]
    pub to: String,
}

pub async fn run(state: &AppState, args: RatesArgs) -> anyhow::Result<()> {
    let Some(snapshot) = state.converter().fetch_snapshot().await else {
        anyhow::bail!("exchange rates are unavailable");
    };

    let (Some(amount), Some(from)) = (args.amount, args.from.as_deref()) else {
        println!("rates as of {} (per {REFERENCE_CURRENCY})", snapshot.date());
        for currency in SUPPORTED_CURRENCIES {
            match snapshot.rate(currency.code) {
                Some(rate) => println!(
                    "{:<4} {:>14.4}  {} ({})",
                    currency.code, rate, currency.name, currency.symbol
                ),
                None => println!("{:<4} {:>14}  {}", currency.code, "n/a", currency.name),
            }
        }
        return Ok(());
    };

    let from = lookup(from)?;
    let to = lookup(&args.to)?;
    match convert(amount, from.code, to.code, Some(&snapshot)) {
        Some(converted) => {
            println!("{amount:.2} {} = {converted:.2} {}", from.code, to.code);
            Ok(())
        }
        None => anyhow::bail!("no rate to convert {} to {}", from.code, to.code),
    }
}

fn lookup(code: &str) -> anyhow::Result<&'static CurrencyInfo> {
    CurrencyInfo::lookup(code).ok_or_else(|| anyhow::anyhow!("unsupported currency: {code}"))
}
