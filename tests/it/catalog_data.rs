//! Data files for every entry of the built-in catalog.
//!
//! Headers follow the production spreadsheets in both languages, so each
//! built-in entry can be rendered end to end from a temporary directory.

use pinkbombs::dispatch::{Dispatcher, FsSource};
use pinkbombs::registry::{self, Locale};
use pinkbombs::server::{ApiKeyGate, Router};
use std::sync::Arc;

use crate::helpers::{DataDir, RAS_CSV, TEST_KEY, TOP10_CSV};

/// Column headers that change with the language of the file
struct Headers {
    suffix: &'static str,
    year: &'static str,
    wild_catch: &'static str,
    country: &'static str,
    farmed_tonnes: &'static str,
    farmed_count: &'static str,
    top10_tons: &'static str,
    flag: &'static str,
    evolution_tonnes: &'static str,
    company: &'static str,
    comp_volume: &'static str,
    comp_revenue: &'static str,
    employees: &'static str,
    comp_hover: &'static str,
    land_volume: &'static str,
    land_company: &'static str,
    land_revenue: &'static str,
    land_hover: &'static str,
    mortality_rate: &'static str,
    criteria: &'static str,
}

const ENGLISH: Headers = Headers {
    suffix: "",
    year: "Year",
    wild_catch: "Tons of wild salmon catch in Atlantic waters",
    country: "Country",
    farmed_tonnes: "Tonnes - live weight",
    farmed_count: "Number of salmons (5kg each)",
    top10_tons: "Tons",
    flag: "Flag",
    evolution_tonnes: "Tonnes - live weight",
    company: "Company",
    comp_volume: "\"Volume, in tons, 2022\"",
    comp_revenue: "Revenues 2022",
    employees: "Employees 2022",
    comp_hover: "Commercial name,Creation date,Headquarters,Website,Revenues,Employees,Note",
    land_volume: "Production in tonnes",
    land_company: "Parent company",
    land_revenue: "Revenues 2022 dollars",
    land_hover: "Number of projects,Countries of projects,Note",
    mortality_rate: "Mortality_rate",
    criteria: "Criteria",
};

const FRENCH: Headers = Headers {
    suffix: "_fr",
    year: "Année",
    wild_catch: "Saumon pêché dans l'Atlantique en tonnes",
    country: "Pays",
    farmed_tonnes: "Tonnes de saumon produit en élevage",
    farmed_count: "Nombre de saumons (5kg chacun)",
    top10_tons: "Tonnes de saumon",
    flag: "Drapeau",
    evolution_tonnes: "Tonnes de saumon",
    company: "Producteur",
    comp_volume: "Tonnes de saumon 2022",
    comp_revenue: "Revenus 2022",
    employees: "Employés 2022",
    comp_hover: "Nom commercial,Date de création,Siège,Site internet,Revenus,Employés,Note",
    land_volume: "Production en tonnes",
    land_company: "Producteur",
    land_revenue: "Revenus 2022 dollars",
    land_hover: "Nombre de projets,Pays des projets,Note",
    mortality_rate: "Taux de mortalité",
    criteria: "Critère",
};

fn headers(locale: Locale) -> &'static Headers {
    match locale {
        Locale::En => &ENGLISH,
        Locale::Fr => &FRENCH,
    }
}

/// `(filename, contents)` of every file the built-in catalog reads for `locale`
pub fn builtin_files(locale: Locale) -> Vec<(String, String)> {
    let h = headers(locale);
    let file = |stem: &str| format!("{}{}.csv", stem, h.suffix);
    let top10 = TOP10_CSV.replacen(
        "Tons,Country,Flag",
        &format!("{},{},{}", h.top10_tons, h.country, h.flag),
        1,
    );

    vec![
        (
            file("discrease_wild_salmon_1.1"),
            format!(
                "{},\"{}\"\n1971,\"12 500\"\n1990,\"8 000,5\"\n2020,\"1 200\"\n",
                h.year, h.wild_catch
            ),
        ),
        (
            file("hyper_growth_salmon_farming_1.2"),
            format!(
                "{},{},{}\n1970,Norway,100\n1980,Norway,4000\n1980,Chile,10\n2020,Norway,1400000\n2020,Chile,700000\n2020,Faroe Islands,\n",
                h.year, h.country, h.farmed_tonnes
            ),
        ),
        (
            file("numbers_salmons_farmed_1.0"),
            format!(
                "{},{}\n2019,100000\n2019,50000\n2020,400000\n",
                h.year, h.farmed_count
            ),
        ),
        (file("top_10_countries_producing_1.3"), top10),
        (
            file("evolution_salmon_farming_country_iso_1.4"),
            format!(
                "{},alpha-3,{},{}\nNorway,NOR,1975,500\nNorway,NOR,1990,150000\nChile,CHL,1990,20000\nNorway,NOR,2020,1400000\nChile,CHL,2020,700000\n",
                h.country, h.year, h.evolution_tonnes
            ),
        ),
        (
            file("top_10_companies_producing_2.1"),
            format!(
                "{},{},{},{},{},{}\n\
                 Mowi ASA,🇳🇴,465000,4900000000,~11500,Mowi,1964,Bergen,https://mowi.com,$4.9B,\"11,500\",\n\
                 Cermaq,🇳🇴,176000,~1100000000,4300,Cermaq,1995,Oslo,https://cermaq.com,$1.1B,\"4,300\",Mitsubishi\n\
                 Salmones Camanchaca,🇨🇱,50000,,,,,,,,,\n",
                h.company, h.flag, h.comp_volume, h.comp_revenue, h.employees, h.comp_hover
            ),
        ),
        (
            file("top_10_ras_companies_2.3"),
            format!(
                "{},{},{},{},{},{}\n\
                 Atlantic Sapphire,🇳🇴,~220000,~50000000,~200,3,Denmark / USA,\n\
                 Nordic Aqua Partners,🇳🇴,20000,,,1,China,Project\n",
                h.land_company, h.flag, h.land_volume, h.land_revenue, h.employees, h.land_hover
            ),
        ),
        (
            file("mortality_rates_4.4"),
            format!(
                "{},{}\nMowi,\"12,5\"\nMowi,\"14,1\"\nCermaq,\"16,0\"\nGrieg,\n",
                h.company, h.mortality_rate
            ),
        ),
        (file("alternatives_text_7"), alternatives_csv(h.criteria)),
        (file("ras_projects_for_map_2.4"), RAS_CSV.to_string()),
    ]
}

/// Five criteria by eight alternatives, matching the default score matrix
fn alternatives_csv(criteria: &str) -> String {
    let alternatives = [
        "Farmed salmon",
        "Land-based salmon",
        "Wild salmon",
        "Trout",
        "Mussels",
        "Seaweed",
        "Legumes",
        "Plant-based fish",
    ];
    let rows = ["Animal welfare", "Climate", "Biodiversity", "Health", "Social"];

    let mut csv = format!("{},{}\n", criteria, alternatives.join(","));
    for row in rows {
        let cells: Vec<String> = alternatives
            .iter()
            .map(|alternative| format!("{} impact on {}", alternative, row.to_lowercase()))
            .collect();
        csv.push_str(&format!("{},{}\n", row, cells.join(",")));
    }
    csv
}

/// Data directory holding the files of both languages
pub fn builtin_data_dir() -> DataDir {
    let dir = DataDir::new();
    for locale in Locale::ALL {
        for (name, contents) in builtin_files(locale) {
            dir.write(&name, &contents);
        }
    }
    dir
}

/// Router over the built-in catalog
pub fn builtin_router(dir: &DataDir) -> Router {
    let dispatcher = Dispatcher::new(
        Arc::new(registry::builtin().clone()),
        Box::new(FsSource::new(dir.path())),
        500,
    );
    Router::new(dispatcher, ApiKeyGate::new(TEST_KEY), Vec::new())
}
