use serde::Serialize;

/// Static background facts about Brazilian agribusiness
#[derive(Debug, Clone, Serialize)]
pub struct MarketContext {
    pub gdp_share: &'static str,
    pub main_products: &'static [&'static str],
    pub brazil_position: &'static [(&'static str, &'static str)],
    pub investment_types: &'static [&'static str],
}

pub fn market_context() -> MarketContext {
    MarketContext {
        gdp_share: "24%",
        main_products: &["Soybeans", "Corn", "Sugarcane", "Coffee", "Beef", "Chicken"],
        brazil_position: &[
            ("soybeans", "Largest producer worldwide"),
            ("corn", "3rd largest producer (after the US and China)"),
            ("sugarcane", "Largest producer worldwide"),
            ("coffee", "Largest producer and exporter"),
            ("beef", "One of the largest exporters"),
        ],
        investment_types: &[
            "Agribusiness equities",
            "FIAGROs (agribusiness real-estate funds)",
            "BDRs of international companies",
            "LCAs (agribusiness credit notes)",
            "CRAs (agribusiness receivables certificates)",
            "Commodity futures",
        ],
    }
}
