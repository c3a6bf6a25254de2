use analysis_core::{AssetCategory, AssetMetadata};

type Row = (&'static str, &'static str, &'static str, &'static str, &'static str);

// (provider symbol, display symbol, name, sector, subsector)
const EQUITIES: &[Row] = &[
    // Animal protein
    ("BEEF3.SA", "BEEF3", "Minerva", "Meatpacking", "Beef"),
    ("MRFG3.SA", "MRFG3", "Marfrig", "Meatpacking", "Beef"),
    ("JBSS3.SA", "JBSS3", "JBS", "Meatpacking", "Animal Protein"),
    ("BRFS3.SA", "BRFS3", "BRF", "Meatpacking", "Poultry & Pork"),
    // Food and beverages
    ("ABEV3.SA", "ABEV3", "Ambev", "Beverages", "Beverages"),
    ("MDIA3.SA", "MDIA3", "M. Dias Branco", "Food", "Processed Food"),
    // Farm inputs
    ("SMTO3.SA", "SMTO3", "São Martinho", "Sugar & Ethanol", "Bioenergy"),
    ("SOJA3.SA", "SOJA3", "Boa Safra", "Inputs", "Seeds"),
    // Trading and logistics
    ("RAIZ4.SA", "RAIZ4", "Raízen", "Bioenergy", "Ethanol"),
    ("CSAN3.SA", "CSAN3", "Cosan", "Bioenergy", "Sugar & Ethanol"),
    // Pulp and paper
    ("SUZB3.SA", "SUZB3", "Suzano", "Pulp & Paper", "Pulp"),
    ("KLBN11.SA", "KLBN11", "Klabin", "Pulp & Paper", "Paper"),
    // Land and crops
    ("SLCE3.SA", "SLCE3", "SLC Agrícola", "Agriculture", "Grains"),
    ("AGRO3.SA", "AGRO3", "BrasilAgro", "Agriculture", "Farmland"),
];

const DEPOSITARY_RECEIPTS: &[Row] = &[
    ("DE", "DE (D1EE34)", "Deere & Company", "Equipment", "Farm Machinery"),
    ("AGCO", "AGCO (A1GC34)", "AGCO Corp", "Equipment", "Farm Machinery"),
    ("ADM", "ADM (A1DM34)", "Archer Daniels", "Trading", "Agricultural Commodities"),
    ("BG", "BG (B1UN34)", "Bunge", "Trading", "Agricultural Commodities"),
    ("MOS", "MOS (M1OS34)", "Mosaic", "Inputs", "Fertilizers"),
    ("NTR", "NTR (N1TR34)", "Nutrien", "Inputs", "Fertilizers"),
    ("CF", "CF (C1F34)", "CF Industries", "Inputs", "Fertilizers"),
    ("CTVA", "CTVA (C1TX34)", "Corteva", "Inputs", "Seeds & Crop Protection"),
];

const FUNDS: &[Row] = &[
    ("RZTR11.SA", "RZTR11", "Riza Terrax", "FIAGRO", "Farmland"),
    ("LFTS11.SA", "LFTS11", "Life FII Agro", "FIAGRO", "Farmland"),
    ("GARE11.SA", "GARE11", "Guardian Real Estate", "FIAGRO", "CRA/Rural Property"),
];

const ETFS: &[Row] = &[("FOOD11.SA", "FOOD11", "Agribusiness ETF", "ETF", "Brazilian Agribusiness")];

const COMMODITIES: &[Row] = &[
    ("ZC=F", "ZC=F", "Corn Futures", "Commodity", "Grains"),
    ("ZS=F", "ZS=F", "Soybean Futures", "Commodity", "Grains"),
    ("ZW=F", "ZW=F", "Wheat Futures", "Commodity", "Grains"),
    ("LE=F", "LE=F", "Live Cattle Futures", "Commodity", "Protein"),
    ("SB=F", "SB=F", "Sugar Futures", "Commodity", "Sugar"),
];

pub(crate) fn assets() -> Vec<AssetMetadata> {
    let groups: [(&[Row], AssetCategory); 5] = [
        (EQUITIES, AssetCategory::Equity),
        (DEPOSITARY_RECEIPTS, AssetCategory::DepositaryReceipt),
        (FUNDS, AssetCategory::Fund),
        (ETFS, AssetCategory::Etf),
        (COMMODITIES, AssetCategory::Commodity),
    ];

    groups
        .iter()
        .flat_map(|(rows, category)| {
            rows.iter().map(move |(symbol, display, name, sector, subsector)| AssetMetadata {
                symbol: symbol.to_string(),
                display_symbol: display.to_string(),
                name: name.to_string(),
                sector: sector.to_string(),
                subsector: subsector.to_string(),
                category: *category,
                cross_listed: *category == AssetCategory::DepositaryReceipt,
            })
        })
        .collect()
}
