//! Built-in catalog of the production charts, in English and French.

use once_cell::sync::Lazy;

use super::{Catalog, RegistryEntry};
use crate::charts::{
    AlternativesMatrixArgs, AnimatedBubbleMapArgs, AreaGroupedArgs, AreaOrderArgs, AreaSingleArgs,
    BoxArgs, BuilderSpec, ColorBarArgs, NamedPalette, Palette, RasBubbleMapArgs, SimpleBarArgs,
    Theme,
};
use crate::constants::{BRAND_BLUE, BRAND_RED, GROUPED_AREA_COLOR};

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    Catalog::new(
        graphs(&ENGLISH),
        vec![ras_map("ras_projects_for_map_2.4.csv", RasBubbleMapArgs {
            add_title_legend: true,
            ..RasBubbleMapArgs::default()
        })],
        graphs(&FRENCH),
        vec![ras_map("ras_projects_for_map_2.4_fr.csv", RasBubbleMapArgs {
            elec_layer: "Consommation d'électricité".to_string(),
            carbon_layer: "Empreinte carbone".to_string(),
            group_title: "Fermes-usines représentées par:".to_string(),
            title: None,
            add_title_legend: true,
            french: true,
        })],
    )
});

/// The catalog compiled into the binary.
pub fn builtin() -> &'static Catalog {
    &BUILTIN
}

/// Column names and titles that differ between the two locales
struct Texts {
    suffix: &'static str,
    year: &'static str,
    wild_catch: &'static str,
    wild_catch_title: &'static str,
    farmed_tonnes: &'static str,
    country: &'static str,
    growth_title: &'static str,
    growth_y_title: &'static str,
    farmed_count: &'static str,
    grouped_legend: &'static str,
    grouped_title: &'static str,
    top10_tons: &'static str,
    flag: &'static str,
    share: &'static str,
    top10_title: &'static str,
    evolution_tonnes: &'static str,
    evolution_title: &'static str,
    company: &'static str,
    comp_volume: &'static str,
    comp_revenue: &'static str,
    employees: &'static str,
    comp_hover: [&'static str; 7],
    comp_title: &'static str,
    land_volume: &'static str,
    land_company: &'static str,
    land_revenue: &'static str,
    land_hover: [&'static str; 3],
    land_title: &'static str,
    land_x_title: &'static str,
    mortality_rate: &'static str,
    mortality_title: &'static str,
    mortality_y_title: &'static str,
    impact_low: &'static str,
    impact_high: &'static str,
}

const ENGLISH: Texts = Texts {
    suffix: "",
    year: "Year",
    wild_catch: "Tons of wild salmon catch in Atlantic waters",
    wild_catch_title: "Tonnes of wild salmon catch in Atlantic waters",
    farmed_tonnes: "Tonnes - live weight",
    country: "Country",
    growth_title: "Farmed salmon production by country",
    growth_y_title: "Tonnes of farmed salmon produced",
    farmed_count: "Number of salmons (5kg each)",
    grouped_legend: "Production of farmed salmons",
    grouped_title: "Number of salmons produced every year",
    top10_tons: "Tons",
    flag: "Flag",
    share: "% of total",
    top10_title: "Top 10 countries producing salmon by tonnes (2021)",
    evolution_tonnes: "Tonnes - live weight",
    evolution_title: "Evolution of salmon farming by country",
    company: "Company",
    comp_volume: "Volume, in tons, 2022",
    comp_revenue: "Revenues 2022",
    employees: "Employees 2022",
    comp_hover: [
        "Commercial name",
        "Creation date",
        "Headquarters",
        "Website",
        "Revenues",
        "Employees",
        "Note",
    ],
    comp_title: "Top 10 companies producing salmon by tonnes (2022)",
    land_volume: "Production in tonnes",
    land_company: "Parent company",
    land_revenue: "Revenues 2022 dollars",
    land_hover: ["Number of projects", "Countries of projects", "Note"],
    land_title: "Top 10 land-based salmon productors (ambitions)",
    land_x_title: "Company ambition for salmon production in tonnes",
    mortality_rate: "Mortality_rate",
    mortality_title: "Mortality rates of farmed salmons by company (2014-2022)",
    mortality_y_title: "Mortality Rate (%)",
    impact_low: "Very limited impact",
    impact_high: "Very high impact",
};

const FRENCH: Texts = Texts {
    suffix: "_fr",
    year: "Année",
    wild_catch: "Saumon pêché dans l'Atlantique en tonnes",
    wild_catch_title: "Saumon pêché dans l'Atlantique en tonnes",
    farmed_tonnes: "Tonnes de saumon produit en élevage",
    country: "Pays",
    growth_title: "Production de saumons atlantique d'élevage par pays",
    growth_y_title: "Tonnes de saumons atlantique",
    farmed_count: "Nombre de saumons (5kg chacun)",
    grouped_legend: "Production de saumons d'élevage",
    grouped_title: "Nombre de saumons produits chaque année",
    top10_tons: "Tonnes de saumon",
    flag: "Drapeau",
    share: "% du total",
    top10_title: "Top 10 pays producteurs de saumon par tonnes (2021)",
    evolution_tonnes: "Tonnes de saumon",
    evolution_title: "Evolution de l'élevage de saumons par pays",
    company: "Producteur",
    comp_volume: "Tonnes de saumon 2022",
    comp_revenue: "Revenus 2022",
    employees: "Employés 2022",
    comp_hover: [
        "Nom commercial",
        "Date de création",
        "Siège",
        "Site internet",
        "Revenus",
        "Employés",
        "Note",
    ],
    comp_title: "Top 10 des producteurs de saumons par tonnes (2022)",
    land_volume: "Production en tonnes",
    land_company: "Producteur",
    land_revenue: "Revenus 2022 dollars",
    land_hover: ["Nombre de projets", "Pays des projets", "Note"],
    land_title: "Top 10 producteurs de saumon d'élevage terrestre (ambitions)",
    land_x_title: "Ambitions des producteurs pour la production de saumon en tonnes",
    mortality_rate: "Taux de mortalité",
    mortality_title: "Taux de mortalité des saumons d'élevage par producteur (2014-2022)",
    mortality_y_title: "Taux de mortalité (%)",
    impact_low: "Impact très réduit",
    impact_high: "Impact très fort",
};

fn brand_blue() -> Palette {
    Palette::custom(&[BRAND_BLUE])
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn graphs(t: &Texts) -> Vec<RegistryEntry> {
    let file = |stem: &str| format!("{}{}.csv", stem, t.suffix);
    vec![
        RegistryEntry::new(
            "salmon-collapse",
            &file("discrease_wild_salmon_1.1"),
            BuilderSpec::AreaSingle(AreaSingleArgs {
                x: t.year.into(),
                y: t.wild_catch.into(),
                title: t.wild_catch_title.into(),
                palette: brand_blue(),
                theme: Theme::SimpleWhite,
                x_title: Some(String::new()),
                block_zoom: true,
            }),
        ),
        RegistryEntry::new(
            "hyper-growth",
            &file("hyper_growth_salmon_farming_1.2"),
            BuilderSpec::AreaOrder(AreaOrderArgs {
                x: t.year.into(),
                y: t.farmed_tonnes.into(),
                color: t.country.into(),
                title: t.growth_title.into(),
                y_title: t.growth_y_title.into(),
                min_x: Some(1975.0),
                reorder: true,
                block_zoom: true,
                palette: Palette::Named(NamedPalette::Dark24),
                theme: Theme::SimpleWhite,
            }),
        ),
        RegistryEntry::new(
            "hyper-growth-grouped",
            &file("numbers_salmons_farmed_1.0"),
            BuilderSpec::AreaGrouped(AreaGroupedArgs {
                x: t.year.into(),
                y: t.farmed_count.into(),
                title: t.grouped_title.into(),
                legend_title: t.grouped_legend.into(),
                color: GROUPED_AREA_COLOR.into(),
                theme: Theme::SimpleWhite,
            }),
        ),
        RegistryEntry::new(
            "top-10",
            &file("top_10_countries_producing_1.3"),
            BuilderSpec::ColorBar(ColorBarArgs {
                x: t.top10_tons.into(),
                y1: t.country.into(),
                y2: t.flag.into(),
                share_column: t.share.into(),
                title: t.top10_title.into(),
                x_title: None,
                y_title: None,
                palette: Palette::custom(&[BRAND_BLUE, BRAND_RED]),
                block_zoom: true,
            }),
        ),
        RegistryEntry::new(
            "evolution-map",
            &file("evolution_salmon_farming_country_iso_1.4"),
            BuilderSpec::AnimatedBubbleMap(AnimatedBubbleMapArgs {
                location: "alpha-3".into(),
                hover: t.country.into(),
                time: t.year.into(),
                size: t.evolution_tonnes.into(),
                title: Some(t.evolution_title.into()),
                min_time: Some(1980.0),
                size_max: 50.0,
                block_zoom: true,
                palette: brand_blue(),
            }),
        ),
        RegistryEntry::new(
            "top-comp",
            &file("top_10_companies_producing_2.1"),
            BuilderSpec::SimpleBar(SimpleBarArgs {
                x: t.comp_volume.into(),
                y1: t.company.into(),
                y2: t.flag.into(),
                revenue: t.comp_revenue.into(),
                employees: t.employees.into(),
                hover_columns: strings(&t.comp_hover),
                title: t.comp_title.into(),
                x_title: None,
                y_title: None,
                color: BRAND_BLUE.into(),
                fix_approx: true,
                block_zoom: false,
            }),
        ),
        RegistryEntry::new(
            "top-land",
            &file("top_10_ras_companies_2.3"),
            BuilderSpec::SimpleBar(SimpleBarArgs {
                x: t.land_volume.into(),
                y1: t.land_company.into(),
                y2: t.flag.into(),
                revenue: t.land_revenue.into(),
                employees: t.employees.into(),
                hover_columns: strings(&t.land_hover),
                title: t.land_title.into(),
                x_title: Some(t.land_x_title.into()),
                y_title: None,
                color: BRAND_BLUE.into(),
                fix_approx: true,
                block_zoom: false,
            }),
        ),
        RegistryEntry::new(
            "mortality-rates",
            &file("mortality_rates_4.4"),
            BuilderSpec::Box(BoxArgs {
                x: t.company.into(),
                y: t.mortality_rate.into(),
                title: t.mortality_title.into(),
                x_title: None,
                y_title: t.mortality_y_title.into(),
                block_zoom: true,
                palette: Palette::Named(NamedPalette::Pastel1),
            }),
        ),
        RegistryEntry::new(
            "alternatives",
            &file("alternatives_text_7"),
            BuilderSpec::AlternativesMatrix(AlternativesMatrixArgs {
                legend_low: t.impact_low.into(),
                legend_high: t.impact_high.into(),
                ..AlternativesMatrixArgs::default()
            }),
        ),
    ]
}

fn ras_map(filename: &str, args: RasBubbleMapArgs) -> RegistryEntry {
    RegistryEntry::new("ras-map", filename, BuilderSpec::RasBubbleMap(args))
}
