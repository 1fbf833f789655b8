//! Bitcoin, exchange rate and stock commands

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::application::errors::{ApiError, CommandError};
use crate::application::services::CommandService;
use crate::domain::entities::{Command, Message, Reply};
use crate::infrastructure::apis::finance::{
    CompanyInfo, CurrentPrice, Earnings, ExchangeRates, Financials, HistoricalPrice, StockQuote, SupportedCurrency,
};
use crate::infrastructure::apis::FinanceApi;

use super::format::{unescape_html, with_commas};
use super::required_arg;

const COINDESK_CREDIT: &str = "Powered by CoinDesk (https://www.coindesk.com/price/)";
const IEX_CREDIT: &str = "Data provided for free by IEX (https://iextrading.com/developer).";

/// Subcommand names that ask for past data
const HISTORICAL: &[&str] = &["historical", "history", "past", "previous", "day", "date"];

fn is_historical(sub: &str) -> bool {
    HISTORICAL.iter().any(|h| h.eq_ignore_ascii_case(sub))
}

/// Accept only `YYYY-MM-DD`
fn date_arg(date: &str) -> Result<&str, CommandError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| date)
        .map_err(|_| CommandError::InvalidArgs("date must be in YYYY-MM-DD format".into()))
}

fn optional_arg(msg: &Message, index: usize) -> &str {
    msg.content.args().get(index).map(String::as_str).unwrap_or("")
}

pub fn register(commands: &mut CommandService, api: Arc<FinanceApi>) {
    let bitcoin_api = api.clone();
    commands.register(
        Command::new("bitcoin")
            .with_description("Bitcoin Price Index (BPI)")
            .with_usage("bitcoin [currency|currencies|historical [YYYY-MM-DD] [currency]]")
            .with_handler(move |msg| {
                let api = bitcoin_api.clone();
                async move { bitcoin(&api, &msg).await }
            }),
    );

    let currency_api = api.clone();
    commands.register(
        Command::new("currency")
            .with_description("Foreign exchange rates")
            .with_aliases(&["exchange", "rates"])
            .with_usage("currency [historical <YYYY-MM-DD>] [base] [symbols,...]")
            .with_handler(move |msg| {
                let api = currency_api.clone();
                async move {
                    let rates = if is_historical(optional_arg(&msg, 0)) {
                        let date = date_arg(required_arg(&msg, 1, "date")?)?;
                        api.historical_rates(date, optional_arg(&msg, 2), optional_arg(&msg, 3)).await?
                    } else {
                        api.exchange_rates(optional_arg(&msg, 0), optional_arg(&msg, 1)).await?
                    };
                    Ok(Reply::text(format_rates(&rates)))
                }
            }),
    );

    commands.register(
        Command::new("stock")
            .with_description("Stock prices and company data")
            .with_aliases(&["stocks"])
            .with_usage("stock [quote|company|earnings|financials] <symbol>")
            .with_handler(move |msg| {
                let api = api.clone();
                async move { stock(&api, &msg).await }
            }),
    );
}

async fn bitcoin(api: &FinanceApi, msg: &Message) -> Result<Reply, CommandError> {
    let text = match msg.content.args().first().map(String::as_str) {
        Some(sub) if sub.eq_ignore_ascii_case("currencies") => format_currencies(&api.bitcoin_currencies().await?),
        Some(sub) if is_historical(sub) => {
            let date = msg.content.args().get(1).map(|d| date_arg(d)).transpose()?;
            let currency = msg.content.args().get(2).map(String::as_str);
            format_bitcoin_historical(&api.bitcoin_historical(date, currency).await?, date)
        }
        Some(currency) => format_bitcoin_in(&api.bitcoin_price_in(currency).await?, currency)?,
        None => format_bitcoin(&api.bitcoin_price().await?),
    };
    Ok(Reply::text(text))
}

async fn stock(api: &FinanceApi, msg: &Message) -> Result<Reply, CommandError> {
    let first = required_arg(msg, 0, "symbol")?;
    let text = match first.to_lowercase().as_str() {
        "quote" => format_quote(&api.stock_quote(required_arg(msg, 1, "symbol")?).await?),
        "company" => format_company(&api.stock_company(required_arg(msg, 1, "symbol")?).await?),
        "earnings" => format_earnings(&api.stock_earnings(required_arg(msg, 1, "symbol")?).await?)?,
        "financials" => format_financials(&api.stock_financials(required_arg(msg, 1, "symbol")?).await?)?,
        _ => format!("{}\n{}", api.stock_price(first).await?, IEX_CREDIT),
    };
    Ok(Reply::text(text))
}

pub fn format_bitcoin(price: &CurrentPrice) -> String {
    let mut lines = vec![price.chart_name.clone().unwrap_or_else(|| "Bitcoin".to_string())];
    for rate in price.bpi.values() {
        let symbol = rate.symbol.as_deref().map(unescape_html).unwrap_or_default();
        lines.push(format!("{}: {} {}{}", rate.description, rate.code, symbol, rate.rate));
    }
    lines.push(COINDESK_CREDIT.to_string());
    lines.push(format!("{}. Updated {}", price.disclaimer.trim_end_matches('.'), price.time.updated));
    lines.join("\n")
}

pub fn format_bitcoin_in(price: &CurrentPrice, currency: &str) -> Result<String, CommandError> {
    let rate = price
        .bpi
        .get(&currency.to_uppercase())
        .ok_or_else(|| ApiError::NotFound(format!("Currency {}", currency.to_uppercase())))?;
    Ok(format!(
        "{}\n{} {}\n{}\n{}. Updated {}",
        rate.description,
        rate.code,
        rate.rate,
        COINDESK_CREDIT,
        price.disclaimer.trim_end_matches('.'),
        price.time.updated
    ))
}

/// Closing price for `date`, or the only entry when no date was asked for
pub fn format_bitcoin_historical(price: &HistoricalPrice, date: Option<&str>) -> String {
    let value = match date {
        Some(date) => price.bpi.get(date),
        None => price.bpi.values().next(),
    };
    format!(
        "{}\n{}\n{} Updated {}",
        value.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string()),
        COINDESK_CREDIT,
        price.disclaimer,
        price.time.updated
    )
}

pub fn format_currencies(currencies: &[SupportedCurrency]) -> String {
    currencies
        .iter()
        .map(|c| format!("{} ({})", c.currency, c.country))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_rates(rates: &ExchangeRates) -> String {
    let mut lines = vec![format!("Against {}", rates.base)];
    lines.extend(rates.rates.iter().map(|(code, rate)| format!("{}: {}", code, rate)));
    lines.push(format!("Date: {}", rates.date));
    lines.join("\n")
}

pub fn format_quote(quote: &StockQuote) -> String {
    let mut lines = vec![quote.symbol.clone(), quote.company_name.clone()];
    if let Some(price) = quote.iex_realtime_price {
        lines.push(format!("IEX Real-Time Price: {}", price));
    }
    lines.push(quote.primary_exchange.clone());
    lines.push(IEX_CREDIT.to_string());
    lines.join("\n")
}

pub fn format_company(company: &CompanyInfo) -> String {
    [
        format!("{} ({})", company.company_name, company.symbol),
        company.description.clone(),
        format!("Website: {}", company.website),
        format!("Exchange: {}", company.exchange),
        format!("Industry: {}", company.industry),
        format!("CEO: {}", company.ceo),
        IEX_CREDIT.to_string(),
    ]
    .join("\n")
}

/// Most recent earnings report
pub fn format_earnings(earnings: &Earnings) -> Result<String, CommandError> {
    let report = earnings
        .earnings
        .first()
        .ok_or_else(|| ApiError::NotFound(format!("Earnings report for {}", earnings.symbol)))?;
    Ok(format_report(&earnings.symbol, report, "EPSReportDate", "EPS Report Date", false))
}

/// Most recent income statement, balance sheet and cash flow
pub fn format_financials(financials: &Financials) -> Result<String, CommandError> {
    let report = financials
        .financials
        .first()
        .ok_or_else(|| ApiError::NotFound(format!("Financial report for {}", financials.symbol)))?;
    Ok(format_report(&financials.symbol, report, "reportDate", "Report Date", true))
}

fn format_report(symbol: &str, report: &Map<String, Value>, date_key: &str, date_label: &str, commas: bool) -> String {
    let mut lines = vec![symbol.to_string()];
    lines.extend(
        report
            .iter()
            .filter(|(key, _)| key.as_str() != date_key)
            .map(|(key, value)| format!("{}: {}", field_title(key), field_value(value, commas))),
    );
    if let Some(date) = report.get(date_key) {
        lines.push(format!("{}: {}", date_label, field_value(date, false)));
    }
    lines.join("\n")
}

/// `actualEPS` -> `Actual EPS`, `researchAndDevelopment` -> `Research & Development`
pub fn field_title(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() * 2);
    for c in key.chars() {
        if !c.is_lowercase() {
            spaced.push(' ');
        }
        spaced.push(c);
    }

    let words: Vec<String> = spaced
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .map(|word| if word == "And" { "&".to_string() } else { word })
        .collect();
    words.join(" ").replace("E P S", "EPS")
}

fn field_value(value: &Value, commas: bool) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "N/A".to_string(),
        Value::Number(n) => match n.as_i64() {
            Some(i) if commas => with_commas(i),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT_PRICE: &str = r#"{
        "time": {"updated": "Apr 20, 2018 12:00:00 UTC"},
        "disclaimer": "This data was produced from the CoinDesk Bitcoin Price Index (USD).",
        "chartName": "Bitcoin",
        "bpi": {
            "USD": {"code": "USD", "symbol": "&#36;", "rate": "8,300.1234", "description": "United States Dollar"},
            "GBP": {"code": "GBP", "symbol": "&pound;", "rate": "5,900.5000", "description": "British Pound Sterling"}
        }
    }"#;

    #[test]
    fn test_format_bitcoin() {
        let price: CurrentPrice = serde_json::from_str(CURRENT_PRICE).unwrap();
        let text = format_bitcoin(&price);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Bitcoin");
        assert_eq!(lines[1], "British Pound Sterling: GBP £5,900.5000");
        assert_eq!(lines[2], "United States Dollar: USD $8,300.1234");
        assert!(lines[4].ends_with("(USD). Updated Apr 20, 2018 12:00:00 UTC"));
    }

    #[test]
    fn test_format_bitcoin_in() {
        let price: CurrentPrice = serde_json::from_str(CURRENT_PRICE).unwrap();
        assert!(format_bitcoin_in(&price, "gbp").unwrap().starts_with("British Pound Sterling\nGBP 5,900.5000\n"));
        assert_eq!(format_bitcoin_in(&price, "xyz").unwrap_err().to_string(), "Currency XYZ not found");
    }

    #[test]
    fn test_format_rates() {
        let rates: ExchangeRates = serde_json::from_str(
            r#"{"base": "USD", "date": "2018-04-20", "rates": {"JPY": 107.6, "EUR": 0.81}}"#,
        )
        .unwrap();
        assert_eq!(format_rates(&rates), "Against USD\nEUR: 0.81\nJPY: 107.6\nDate: 2018-04-20");
    }

    #[test]
    fn test_format_currencies() {
        let list: Vec<SupportedCurrency> = serde_json::from_str(
            r#"[{"currency": "AED", "country": "United Arab Emirates Dirham"}, {"currency": "AFN", "country": "Afghan Afghani"}]"#,
        )
        .unwrap();
        assert_eq!(format_currencies(&list), "AED (United Arab Emirates Dirham), AFN (Afghan Afghani)");
    }

    #[test]
    fn test_format_bitcoin_historical() {
        let price: HistoricalPrice = serde_json::from_str(
            r#"{"bpi": {"2018-04-19": 8263.5}, "disclaimer": "CoinDesk BPI.", "time": {"updated": "Apr 20, 2018"}}"#,
        )
        .unwrap();
        assert_eq!(
            format_bitcoin_historical(&price, Some("2018-04-19")),
            format!("8263.5\n{}\nCoinDesk BPI. Updated Apr 20, 2018", COINDESK_CREDIT)
        );
        assert!(format_bitcoin_historical(&price, None).starts_with("8263.5\n"));
        assert!(format_bitcoin_historical(&price, Some("2001-01-01")).starts_with("N/A\n"));
    }

    #[test]
    fn test_date_and_subcommand_parsing() {
        assert_eq!(date_arg("2018-04-19").unwrap(), "2018-04-19");
        assert!(matches!(date_arg("yesterday"), Err(CommandError::InvalidArgs(_))));
        assert!(matches!(date_arg("2018-13-01"), Err(CommandError::InvalidArgs(_))));
        assert!(is_historical("History"));
        assert!(!is_historical("USD"));
    }

    #[test]
    fn test_format_company() {
        let company: CompanyInfo = serde_json::from_str(
            r#"{"symbol": "AAPL", "companyName": "Apple Inc.", "exchange": "Nasdaq Global Select",
                "industry": "Computer Hardware", "website": "http://www.apple.com",
                "description": "Apple designs things.", "CEO": "Timothy D. Cook"}"#,
        )
        .unwrap();
        assert_eq!(
            format_company(&company),
            format!(
                "Apple Inc. (AAPL)\nApple designs things.\nWebsite: http://www.apple.com\nExchange: Nasdaq Global Select\n\
                 Industry: Computer Hardware\nCEO: Timothy D. Cook\n{}",
                IEX_CREDIT
            )
        );
    }

    #[test]
    fn test_format_earnings() {
        let earnings: Earnings = serde_json::from_str(
            r#"{"symbol": "AAPL", "earnings": [
                {"actualEPS": 2.73, "consensusEPS": 2.69, "numberOfEstimates": 10, "EPSReportDate": "2018-05-01"},
                {"actualEPS": 3.89, "consensusEPS": 3.86, "numberOfEstimates": 11, "EPSReportDate": "2018-02-01"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            format_earnings(&earnings).unwrap(),
            "AAPL\nActual EPS: 2.73\nConsensus EPS: 2.69\nNumber Of Estimates: 10\nEPS Report Date: 2018-05-01"
        );

        let empty: Earnings = serde_json::from_str(r#"{"symbol": "XYZ", "earnings": []}"#).unwrap();
        assert_eq!(format_earnings(&empty).unwrap_err().to_string(), "Earnings report for XYZ not found");
    }

    #[test]
    fn test_format_financials() {
        let financials: Financials = serde_json::from_str(
            r#"{"symbol": "AAPL", "financials": [
                {"reportDate": "2018-03-31", "grossProfit": 23422000000, "researchAndDevelopment": 3378000000, "cashChange": null}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            format_financials(&financials).unwrap(),
            "AAPL\nCash Change: N/A\nGross Profit: 23,422,000,000\nResearch & Development: 3,378,000,000\nReport Date: 2018-03-31"
        );
    }

    #[test]
    fn test_field_title() {
        assert_eq!(field_title("actualEPS"), "Actual EPS");
        assert_eq!(field_title("EPSSurpriseDollar"), "EPS Surprise Dollar");
        assert_eq!(field_title("yearAgoChangePercent"), "Year Ago Change Percent");
    }

    #[test]
    fn test_format_quote() {
        let quote: StockQuote = serde_json::from_str(
            r#"{"symbol": "AAPL", "companyName": "Apple Inc.", "primaryExchange": "Nasdaq Global Select", "iexRealtimePrice": 165.5}"#,
        )
        .unwrap();
        assert_eq!(
            format_quote(&quote),
            format!("AAPL\nApple Inc.\nIEX Real-Time Price: 165.5\nNasdaq Global Select\n{}", IEX_CREDIT)
        );
    }
}
