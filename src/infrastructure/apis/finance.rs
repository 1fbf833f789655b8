//! CoinDesk, fixer.io and IEX clients

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::application::errors::ApiError;
use crate::infrastructure::http::ApiClient;

const COINDESK_BASE: &str = "https://api.coindesk.com/v1/bpi";
const FIXER_BASE: &str = "https://data.fixer.io/api";
const IEX_BASE: &str = "https://api.iextrading.com/1.0/stock";

/// CoinDesk Bitcoin Price Index
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPrice {
    pub time: UpdateTime,
    pub disclaimer: String,
    #[serde(default)]
    pub chart_name: Option<String>,
    pub bpi: BTreeMap<String, BpiRate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTime {
    pub updated: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BpiRate {
    pub code: String,
    #[serde(default)]
    pub symbol: Option<String>,
    pub rate: String,
    pub description: String,
}

/// CoinDesk closing prices, keyed by `YYYY-MM-DD`
#[derive(Debug, Clone, Deserialize)]
pub struct HistoricalPrice {
    pub time: UpdateTime,
    pub disclaimer: String,
    #[serde(default)]
    pub bpi: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupportedCurrency {
    pub currency: String,
    pub country: String,
}

/// Latest exchange rates from fixer.io
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeRates {
    pub base: String,
    pub date: String,
    pub rates: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockQuote {
    pub symbol: String,
    pub company_name: String,
    pub primary_exchange: String,
    #[serde(default)]
    pub iex_realtime_price: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    pub symbol: String,
    pub company_name: String,
    #[serde(default)]
    pub exchange: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "CEO", default)]
    pub ceo: String,
}

/// Quarterly reports, most recent first; the report fields vary
#[derive(Debug, Clone, Deserialize)]
pub struct Earnings {
    pub symbol: String,
    pub earnings: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Financials {
    pub symbol: String,
    pub financials: Vec<Map<String, Value>>,
}

pub struct FinanceApi {
    client: Arc<ApiClient>,
    fixer_api_key: Option<String>,
}

impl FinanceApi {
    pub fn new(client: Arc<ApiClient>, fixer_api_key: Option<String>) -> Self {
        Self { client, fixer_api_key }
    }

    /// Current BPI in every currency CoinDesk quotes by default
    pub async fn bitcoin_price(&self) -> Result<CurrentPrice, ApiError> {
        let url = format!("{}/currentprice.json", COINDESK_BASE);
        self.client.get(&url, &[]).await?.success_json()
    }

    /// Current BPI in a single currency
    pub async fn bitcoin_price_in(&self, currency: &str) -> Result<CurrentPrice, ApiError> {
        let url = format!("{}/currentprice/{}.json", COINDESK_BASE, currency.to_uppercase());
        self.client.get(&url, &[]).await?.success_json()
    }

    pub async fn bitcoin_currencies(&self) -> Result<Vec<SupportedCurrency>, ApiError> {
        let url = format!("{}/supported-currencies.json", COINDESK_BASE);
        self.client.get(&url, &[]).await?.success_json()
    }

    /// Closing BPI for `date` (`YYYY-MM-DD`), or for yesterday when `None`
    pub async fn bitcoin_historical(&self, date: Option<&str>, currency: Option<&str>) -> Result<HistoricalPrice, ApiError> {
        let url = format!("{}/historical/close.json", COINDESK_BASE);
        let query = match date {
            Some(date) => {
                let mut query = vec![("start", date.to_string()), ("end", date.to_string())];
                if let Some(currency) = currency {
                    query.push(("currency", currency.to_uppercase()));
                }
                query
            }
            None => vec![("for", "yesterday".to_string())],
        };
        self.client.get(&url, &query).await?.success_json()
    }

    /// Latest rates quoted against `base` (EUR when empty)
    pub async fn exchange_rates(&self, base: &str, symbols: &str) -> Result<ExchangeRates, ApiError> {
        self.rates("latest", base, symbols).await
    }

    /// Rates as published on `date` (`YYYY-MM-DD`)
    pub async fn historical_rates(&self, date: &str, base: &str, symbols: &str) -> Result<ExchangeRates, ApiError> {
        self.rates(date, base, symbols).await
    }

    async fn rates(&self, endpoint: &str, base: &str, symbols: &str) -> Result<ExchangeRates, ApiError> {
        let key = self
            .fixer_api_key
            .as_deref()
            .ok_or_else(|| ApiError::Service("no fixer.io API key configured".into()))?;

        let mut query = vec![("access_key", key.to_string())];
        if !base.is_empty() {
            query.push(("base", base.to_uppercase()));
        }
        if !symbols.is_empty() {
            query.push(("symbols", symbols.to_uppercase()));
        }

        let url = format!("{}/{}", FIXER_BASE, endpoint);
        let response = self.client.get(&url, &query).await?;
        parse_exchange_rates(&response.json()?)
    }

    /// Latest price as IEX reports it, verbatim
    pub async fn stock_price(&self, symbol: &str) -> Result<String, ApiError> {
        let url = format!("{}/{}/price", IEX_BASE, symbol);
        let response = self.client.get(&url, &[]).await?;
        if !response.is_success() {
            return Err(ApiError::Service(response.body.trim().to_string()));
        }
        Ok(response.body.trim().to_string())
    }

    pub async fn stock_quote(&self, symbol: &str) -> Result<StockQuote, ApiError> {
        self.stock(symbol, "quote").await
    }

    pub async fn stock_company(&self, symbol: &str) -> Result<CompanyInfo, ApiError> {
        self.stock(symbol, "company").await
    }

    pub async fn stock_earnings(&self, symbol: &str) -> Result<Earnings, ApiError> {
        self.stock(symbol, "earnings").await
    }

    pub async fn stock_financials(&self, symbol: &str) -> Result<Financials, ApiError> {
        self.stock(symbol, "financials").await
    }

    async fn stock<T: serde::de::DeserializeOwned>(&self, symbol: &str, endpoint: &str) -> Result<T, ApiError> {
        let url = format!("{}/{}/{}", IEX_BASE, symbol, endpoint);
        self.client.get(&url, &[]).await?.success_json()
    }
}

/// fixer.io reports failures in the body, sometimes with a 200 status
pub fn parse_exchange_rates(body: &Value) -> Result<ExchangeRates, ApiError> {
    let failed = body.get("success").and_then(Value::as_bool) == Some(false) || body.get("error").is_some();
    if failed {
        let detail = match body.get("error") {
            Some(Value::String(s)) => s.clone(),
            Some(error) => error
                .get("info")
                .or_else(|| error.get("type"))
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
            None => "unknown error".to_string(),
        };
        return Err(ApiError::Service(detail));
    }

    serde_json::from_value(body.clone()).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fixer_success() {
        let body = json!({
            "success": true,
            "base": "EUR",
            "date": "2018-04-20",
            "rates": {"USD": 1.23, "GBP": 0.88}
        });
        let rates = parse_exchange_rates(&body).unwrap();
        assert_eq!(rates.base, "EUR");
        assert_eq!(rates.rates.keys().collect::<Vec<_>>(), vec!["GBP", "USD"]);
    }

    #[test]
    fn test_fixer_errors() {
        let body = json!({"success": false, "error": {"code": 101, "type": "missing_access_key", "info": "You have not supplied an API Access Key."}});
        assert_eq!(
            parse_exchange_rates(&body).unwrap_err().to_string(),
            "Error: You have not supplied an API Access Key."
        );

        let legacy = json!({"error": "Invalid base"});
        assert_eq!(parse_exchange_rates(&legacy).unwrap_err().to_string(), "Error: Invalid base");
    }

    #[test]
    fn test_coindesk_shape() {
        let body = r#"{
            "time": {"updated": "Apr 20, 2018 12:00:00 UTC"},
            "disclaimer": "This data was produced from the CoinDesk Bitcoin Price Index.",
            "chartName": "Bitcoin",
            "bpi": {"USD": {"code": "USD", "symbol": "&#36;", "rate": "8,300.1234", "description": "United States Dollar", "rate_float": 8300.1234}}
        }"#;
        let price: CurrentPrice = serde_json::from_str(body).unwrap();
        assert_eq!(price.chart_name.as_deref(), Some("Bitcoin"));
        assert_eq!(price.bpi["USD"].rate, "8,300.1234");
    }

    #[test]
    fn test_historical_shape() {
        let body = r#"{
            "bpi": {"2018-04-19": 8263.5},
            "disclaimer": "This data was produced from the CoinDesk Bitcoin Price Index.",
            "time": {"updated": "Apr 20, 2018 00:03:00 UTC"}
        }"#;
        let price: HistoricalPrice = serde_json::from_str(body).unwrap();
        assert_eq!(price.bpi["2018-04-19"], 8263.5);
    }

    #[test]
    fn test_company_shape() {
        let body = r#"{"symbol": "AAPL", "companyName": "Apple Inc.", "exchange": "Nasdaq Global Select",
            "industry": "Computer Hardware", "website": "http://www.apple.com", "description": "Apple designs things.",
            "CEO": "Timothy D. Cook", "issueType": "cs"}"#;
        let company: CompanyInfo = serde_json::from_str(body).unwrap();
        assert_eq!(company.ceo, "Timothy D. Cook");
    }

    #[tokio::test]
    async fn test_missing_fixer_key() {
        let client = Arc::new(ApiClient::new(&Default::default()).unwrap());
        let api = FinanceApi::new(client, None);
        let err = api.exchange_rates("", "").await.unwrap_err();
        assert_eq!(err.to_string(), "Error: no fixer.io API key configured");
    }
}
