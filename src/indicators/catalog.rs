//! Static catalog of the monitored indicators
//!
//! This is the single source for indicator metadata, target thresholds and the
//! provider metric each indicator is fed from.

use crate::models::{evaluate_trigger, Category, Comparison, Indicator};
use crate::services::providers::ProviderKind;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorDefinition {
    pub id: u32,
    /// Normalized field name emitted by the provider adapter
    pub metric: &'static str,
    pub provider: ProviderKind,
    pub category: Category,
    pub name_en: &'static str,
    pub name_zh: &'static str,
    pub principle: &'static str,
    pub calculation: &'static str,
    pub usage: &'static str,
    pub target_value: Option<f64>,
    pub comparison: Comparison,
}

impl IndicatorDefinition {
    /// Fresh store record for this definition, before any fetch cycle
    pub fn to_indicator(&self, now: DateTime<Utc>) -> Indicator {
        Indicator {
            id: self.id,
            category: self.category,
            name_en: self.name_en.to_string(),
            name_zh: self.name_zh.to_string(),
            principle: self.principle.to_string(),
            calculation: self.calculation.to_string(),
            usage: self.usage.to_string(),
            data_source: self.provider.display_name().to_string(),
            current_value: 0.0,
            target_value: self.target_value,
            comparison: self.comparison,
            is_triggered: evaluate_trigger(self.comparison, 0.0, self.target_value),
            updated_at: now,
        }
    }
}

#[allow(clippy::too_many_arguments)]
const fn def(
    id: u32,
    metric: &'static str,
    provider: ProviderKind,
    category: Category,
    name_en: &'static str,
    name_zh: &'static str,
    principle: &'static str,
    calculation: &'static str,
    usage: &'static str,
    target_value: Option<f64>,
    comparison: Comparison,
) -> IndicatorDefinition {
    IndicatorDefinition {
        id,
        metric,
        provider,
        category,
        name_en,
        name_zh,
        principle,
        calculation,
        usage,
        target_value,
        comparison,
    }
}

use Category::{MarketStructure, OnChain, Sentiment, Technical};
use Comparison::{Gte, Lte};
use ProviderKind::{BlockchainCenter, Coinglass, Glassnode, MicroStrategy, Prediction, TradingView};

const DEFINITIONS: &[IndicatorDefinition] = &[
    // Glassnode
    def(25, "nupl", Glassnode, OnChain, "Net Unrealized Profit/Loss", "未实现净盈亏",
        "Share of market cap held as unrealized profit", "(Market Cap - Realized Cap) / Market Cap",
        "Values above 0.75 historically mark euphoria", Some(0.75), Gte),
    def(24, "rhodl", Glassnode, OnChain, "RHODL Ratio", "RHODL比率",
        "Ratio of young to old realized-value HODL waves", "RV HODL 1w / RV HODL 1-2y, age weighted",
        "Extreme readings flag overheated cycles", Some(50_000.0), Gte),
    def(22, "puell", Glassnode, OnChain, "Puell Multiple", "Puell倍数",
        "Miner revenue relative to its yearly average", "Daily issuance USD / 365d MA of issuance USD",
        "High values signal miner profit taking", Some(4.0), Gte),
    def(26, "reserveRisk", Glassnode, OnChain, "Reserve Risk", "储备风险",
        "Confidence of long-term holders relative to price", "Price / HODL Bank",
        "High values mean low holder confidence at current price", Some(0.02), Gte),
    def(21, "mvrv", Glassnode, OnChain, "MVRV Z-Score", "MVRV Z分数",
        "Deviation of market value from realized value", "(Market Cap - Realized Cap) / StdDev(Market Cap)",
        "Scores above 7 historically mark cycle tops", Some(7.0), Gte),
    def(27, "stHolderSupply", Glassnode, OnChain, "Short-Term Holder Supply", "短期持有者供应量",
        "Coins held for less than 155 days", "Sum of UTXOs younger than 155 days",
        "Rising supply shows new money entering", None, Gte),
    def(28, "ltHolderOutflow", Glassnode, OnChain, "Long-Term Holder Outflow", "长期持有者流出",
        "Coins moved by long-term holders", "Spent output volume older than 155 days",
        "Spikes indicate long-term holders distributing", None, Gte),
    // Coinglass
    def(29, "altSeasonBtcTop", Coinglass, Sentiment, "Altcoin Season BTC Top", "山寨季BTC顶部",
        "Bitcoin dominance stretch during altcoin seasons", "Composite of dominance and altcoin breadth",
        "Values at or above 1 coincide with BTC tops", Some(1.0), Gte),
    def(30, "altSeasonIndex", Coinglass, Sentiment, "Altcoin Season Index", "山寨季指数",
        "Share of top altcoins outperforming BTC over 90 days", "Outperforming altcoins / 50 * 100",
        "Above 75 is altcoin season", Some(75.0), Gte),
    def(9, "cbi", Coinglass, Sentiment, "CBBI Index", "CBBI指数",
        "Aggregate of cycle top indicators", "Average of normalized cycle metrics",
        "Scores above 90 mark late cycle", Some(90.0), Gte),
    def(17, "etfNetOutflow", Coinglass, MarketStructure, "ETF Net Outflow Days", "ETF净流出天数",
        "Consecutive days of spot ETF net outflows", "Count of consecutive negative net-flow days",
        "Long streaks show institutional de-risking", Some(10.0), Gte),
    def(18, "etfBtcRatio", Coinglass, MarketStructure, "ETF/BTC Ratio", "ETF持仓占比",
        "Share of circulating supply held by spot ETFs", "ETF holdings / circulating supply",
        "Tracks institutional absorption", None, Gte),
    def(16, "annualRate3m", Coinglass, MarketStructure, "3M Futures Annualized Rate", "三个月期货年化费率",
        "Basis of quarterly futures over spot", "(Futures - Spot) / Spot * 365 / days to expiry",
        "Above 30% signals leveraged euphoria", Some(30.0), Gte),
    def(11, "usdtSavingsRate", Coinglass, MarketStructure, "USDT Savings Rate", "USDT活期理财利率",
        "Exchange lending rate for USDT", "Flexible savings APY",
        "High rates show strong leverage demand", Some(20.0), Gte),
    // TradingView
    def(2, "ahr999TopSignal", TradingView, Technical, "AHR999 Top Signal", "AHR999逃顶指标",
        "Price stretch over the cost and growth models", "Price / 200d cost * Price / growth valuation",
        "Values above 4 suggest taking profit", Some(4.0), Gte),
    def(3, "ahr999Accumulation", TradingView, Technical, "AHR999 Accumulation", "AHR999囤币指标",
        "Discount against the cost and growth models", "Price / 200d cost * Price / growth valuation",
        "Values below 0.45 mark accumulation zones", Some(0.45), Lte),
    def(4, "mayerMultiple", TradingView, Technical, "Mayer Multiple", "梅耶倍数",
        "Price relative to the 200-day moving average", "Price / 200d SMA",
        "Above 2.4 historically overheated", Some(2.4), Gte),
    def(7, "ma2yMultiplier", TradingView, Technical, "2-Year MA Multiplier", "两年均线乘数",
        "Price against the 2-year MA and its 5x band", "Price / (2y SMA * 5)",
        "Crossing 1 marks the top band", Some(1.0), Gte),
    def(14, "ma4y", TradingView, Technical, "4-Year Moving Average", "四年移动均线",
        "Full-cycle average price", "1460d SMA of price",
        "Long-term floor reference", None, Gte),
    def(15, "rsi22", TradingView, Technical, "22-Day RSI", "22日RSI",
        "Momentum over 22 days", "100 - 100 / (1 + RS)",
        "Above 80 is overbought", Some(80.0), Gte),
    def(23, "oscillatorBMO", TradingView, Technical, "BMO Oscillator", "BMO振荡指标",
        "Composite of price deviation oscillators", "Average of normalized deviation oscillators",
        "Above 2 signals overextension", Some(2.0), Gte),
    // Blockchain Center
    def(10, "btIndex", BlockchainCenter, OnChain, "Bitcoin Temperature", "比特币温度",
        "Measures market temperature", "Composite of various metrics",
        "Identify market phases", Some(80.0), Gte),
    def(8, "rainbowChart", BlockchainCenter, OnChain, "Rainbow Chart", "彩虹图",
        "Price bands based on logarithmic regression", "Log regression of price history",
        "Band 8 and above is the bubble zone", Some(8.0), Gte),
    // MicroStrategy
    def(1, "costBasis", MicroStrategy, MarketStructure, "Institutional Cost Basis", "机构持仓成本",
        "Shows institutional entry price", "Total Investment / Total Bitcoin Holdings",
        "Track institutional positioning", None, Gte),
    // Prediction
    def(5, "piCycleTop", Prediction, Sentiment, "Pi Cycle Top", "Pi周期顶部",
        "Identifies market cycle tops", "111d SMA / (350d SMA * 2)",
        "Crossing 1 has marked previous tops", Some(1.0), Gte),
    def(6, "sminstonForecast", Prediction, Sentiment, "Sminston Forecast", "Sminston预测",
        "Price prediction model", "Machine learning forecast",
        "Price trend prediction", None, Gte),
    def(13, "goldBtcRatio", Prediction, Sentiment, "Gold/BTC Ratio", "黄金/BTC比率",
        "Compares BTC to gold", "Gold market cap / BTC market cap",
        "Store of value analysis", None, Gte),
    def(19, "pricePrediction", Prediction, Sentiment, "Price Prediction", "价格预测",
        "Short-term price forecast", "Technical analysis model",
        "Trading signal generation", None, Gte),
];

/// Indicator catalog loaded once at startup
#[derive(Debug, Clone)]
pub struct IndicatorCatalog {
    definitions: Vec<IndicatorDefinition>,
}

impl IndicatorCatalog {
    pub fn new(definitions: Vec<IndicatorDefinition>) -> Self {
        Self { definitions }
    }

    /// Apply per-indicator comparison overrides from configuration
    pub fn with_comparisons(mut self, overrides: &HashMap<u32, Comparison>) -> Self {
        for definition in &mut self.definitions {
            if let Some(comparison) = overrides.get(&definition.id) {
                definition.comparison = *comparison;
            }
        }
        self
    }

    pub fn definitions(&self) -> &[IndicatorDefinition] {
        &self.definitions
    }

    pub fn get(&self, id: u32) -> Option<&IndicatorDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    pub fn for_provider(&self, provider: ProviderKind) -> impl Iterator<Item = &IndicatorDefinition> {
        self.definitions.iter().filter(move |d| d.provider == provider)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for IndicatorCatalog {
    fn default() -> Self {
        Self::new(DEFINITIONS.to_vec())
    }
}
