//! Land-based (RAS) salmon farms on a Leaflet map.
//!
//! The artifact is a complete HTML page. Each farm is drawn twice, once per
//! exclusive layer: bubble size follows the estimated electricity use in
//! one layer and the carbon footprint in the other. Popups list the farm's
//! facts in English or French.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{BuildError, BuildResult, numbers, require_text};
use crate::data::Dataset;
use crate::data::numeric::{NumberStyle, format_thousands, keep_4_figures};

const COL_LAT: &str = "Lat";
const COL_LONG: &str = "Long";
const COL_ELEC_LOW: &str = "elec_conso_kWh_low";
const COL_ELEC_HIGH: &str = "elec_conso_kWh_high";
const COL_CARBON_LOW: &str = "carbon_kt_low";
const COL_CARBON_HIGH: &str = "carbon_kt_high";
const COL_PRODUCTION: &str = "Production Max";
const COL_INTENSITY: &str = "Carbon intensity of electricity - gCO2/kWh";
const COL_COUNTRY: &str = "Country";
const COL_STATUS: &str = "Status";
const COL_DETAILED_STATUS: &str = "Detailed status";
const COL_LOCATION_SOURCE: &str = "Location source";
const COL_LOCATION: &str = "Location";
const COL_INFO_LINK: &str = "Link info (no text)";
const COL_LATEST_UPDATE: &str = "Latest update";
const COL_COMPANY: &str = "Parent company";
const COL_TECHNOLOGY: &str = "Technologie";
const COL_SPECIES: &str = "Species";

const CARBON_INTENSITY_LINK: &str = "https://ourworldindata.org/grapher/carbon-intensity-electricity";

/// Bubble radius bounds in pixels
const ELEC_RADIUS: (f64, f64) = (3.0, 40.0);
const CARBON_RADIUS: (f64, f64) = (3.0, 50.0);

/// Fill colors per status (operating, in construction, project)
const SHADES_SALMON: [&str; 3] = ["#C66264", "#fa8072", "#FEA993"];
const SHADES_BROWN: [&str; 3] = ["#412829", "#6e4546", "#ac7b7d"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RasBubbleMapArgs {
    /// Name of the electricity layer
    pub elec_layer: String,
    /// Name of the carbon layer
    pub carbon_layer: String,
    /// Heading of the layer switch
    pub group_title: String,
    /// Page title, the locale default is used with `add_title_legend`
    pub title: Option<String>,
    pub add_title_legend: bool,
    pub french: bool,
}

impl Default for RasBubbleMapArgs {
    fn default() -> Self {
        Self {
            elec_layer: "Electricity consumption".to_string(),
            carbon_layer: "Carbon footprint".to_string(),
            group_title: "Farms represented by estimated:".to_string(),
            title: None,
            add_title_legend: false,
            french: false,
        }
    }
}

impl RasBubbleMapArgs {
    pub fn validate(&self) -> BuildResult<()> {
        require_text("elec_layer", &self.elec_layer)?;
        require_text("carbon_layer", &self.carbon_layer)
    }
}

struct Labels {
    aliases: [&'static str; 11],
    tonnes: &'static str,
    carbon_unit: &'static str,
    default_title: &'static str,
    legend_subtitle: &'static str,
    statuses: [&'static str; 3],
    size_note: [&'static str; 2],
    methodology: &'static str,
    scroll_toggle: &'static str,
}

const ENGLISH: Labels = Labels {
    aliases: [
        "Company:",
        "Technology:",
        "Salmon species:",
        "Country:",
        "Location:",
        "Status:",
        "Production capacity (annual):",
        "Latest update found:",
        "Electricity consumption (annual):",
        "Carbon intensity of electricity:",
        "Carbon footprint (annual):",
    ],
    tonnes: "tonnes",
    carbon_unit: "kilo tonnes CO2",
    default_title: "The future of land-based salmon farming",
    legend_subtitle: "Land-based Farms by Status",
    statuses: ["Operating", "In construction", "Project"],
    size_note: [
        "Size depends on farm production, estimated",
        "electricity consumption and carbon footprint",
    ],
    methodology: "see Methodology",
    scroll_toggle: "Toggle scroll zoom",
};

const FRENCH: Labels = Labels {
    aliases: [
        "Entreprise :",
        "Technologie :",
        "Espèce de saumon :",
        "Pays :",
        "Localisation :",
        "Statut :",
        "Capacité de production (annuelle) :",
        "Dernière mise à jour :",
        "Consommation d'électricité (annuelle) :",
        "Intensité carbone de l'électricité :",
        "Empreinte carbone (annuelle) :",
    ],
    tonnes: "tonnes",
    carbon_unit: "kilotonnes CO2",
    default_title: "L'avenir de l'élevage de saumon sur terre",
    legend_subtitle: "Fermes-usines par statut",
    statuses: ["En activité", "En construction", "Projet"],
    size_note: [
        "La taille dépend de la production, de la",
        "consommation d'électricité et de l'empreinte carbone estimées",
    ],
    methodology: "voir la Méthodologie",
    scroll_toggle: "Activer le zoom à la molette",
};

/// Color slot of a status: operating, in construction, anything else.
fn status_index(status: &str) -> usize {
    match status.trim() {
        "Operating" | "En activité" => 0,
        "In construction" | "En construction" => 1,
        _ => 2,
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Anchor to an http(s) page; any other target renders as plain text.
fn link(href: &str, text: &str) -> String {
    let href = href.trim();
    let scheme = href.split_once("://").map(|(scheme, _)| scheme.to_ascii_lowercase());
    if !matches!(scheme.as_deref(), Some("http" | "https")) {
        return escape_html(text);
    }
    format!(
        r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
        escape_html(href),
        escape_html(text)
    )
}

/// Linear map from a value range onto `[min_rad, max_rad]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RadiusScale {
    slope: f64,
    intercept: f64,
    min_rad: f64,
}

impl RadiusScale {
    fn fit(values: &[Option<f64>], (min_rad, max_rad): (f64, f64)) -> Self {
        let present = values.iter().flatten().copied();
        let (min_x, max_x) = present.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !min_x.is_finite() || !max_x.is_finite() || max_x == min_x {
            return Self {
                slope: 0.0,
                intercept: (min_rad + max_rad) / 2.0,
                min_rad,
            };
        }
        let slope = (max_rad - min_rad) / (max_x - min_x);
        Self {
            slope,
            intercept: max_rad - slope * max_x,
            min_rad,
        }
    }

    fn radius(&self, value: Option<f64>) -> f64 {
        match value {
            Some(v) => v * self.slope + self.intercept,
            None => self.min_rad,
        }
    }
}

fn range_text(low: Option<f64>, high: Option<f64>, unit: &str) -> String {
    match (low, high) {
        (Some(low), Some(high)) => {
            format!("{} - {} {}", keep_4_figures(low), keep_4_figures(high), unit)
        }
        _ => String::new(),
    }
}

fn mid(low: Option<f64>, high: Option<f64>) -> Option<f64> {
    Some((low? + high?) / 2.0)
}

struct Farm {
    lat: f64,
    lng: f64,
    status: usize,
    elec_mid: Option<f64>,
    carbon_mid: Option<f64>,
    popup: String,
}

fn collect_farms(dataset: &Dataset, labels: &Labels) -> BuildResult<Vec<Farm>> {
    let style = NumberStyle::DecimalComma;
    let lat = numbers(dataset, COL_LAT, style)?;
    let lng = numbers(dataset, COL_LONG, style)?;
    let elec_low = numbers(dataset, COL_ELEC_LOW, style)?;
    let elec_high = numbers(dataset, COL_ELEC_HIGH, style)?;
    let carbon_low = numbers(dataset, COL_CARBON_LOW, style)?;
    let carbon_high = numbers(dataset, COL_CARBON_HIGH, style)?;
    let production = numbers(dataset, COL_PRODUCTION, style)?;
    let intensity = numbers(dataset, COL_INTENSITY, style)?;
    let latest = numbers(dataset, COL_LATEST_UPDATE, style)?;

    let country = dataset.texts(COL_COUNTRY)?;
    let status = dataset.texts(COL_STATUS)?;
    let detailed = dataset.texts(COL_DETAILED_STATUS)?;
    let location_source = dataset.texts(COL_LOCATION_SOURCE)?;
    let location = dataset.texts(COL_LOCATION)?;
    let info_link = dataset.texts(COL_INFO_LINK)?;
    let company = dataset.texts(COL_COMPANY)?;
    let technology = dataset.texts(COL_TECHNOLOGY)?;
    let species = dataset.texts(COL_SPECIES)?;

    let mut farms = Vec::new();
    for row in 0..dataset.row_count() {
        // Company-level ambitions have no coordinates
        let (Some(lat), Some(lng)) = (lat[row], lng[row]) else {
            continue;
        };

        let elec_low_gwh = elec_low[row].map(|v| v / 1e6);
        let elec_high_gwh = elec_high[row].map(|v| v / 1e6);

        let detail = detailed[row].trim();
        let status_text = if detail.is_empty() || status_index(detail) < 2 {
            status[row].clone()
        } else {
            format!("{} ({})", status[row], detail)
        };
        let capacity = production[row]
            .map(|p| format!("{} {}", format_thousands(p.trunc(), 0), labels.tonnes))
            .unwrap_or_default();
        let latest_text = latest[row]
            .map(|y| format!("{}", y as i64))
            .unwrap_or_else(|| "NAN".to_string());
        let intensity_text = intensity[row]
            .map(|g| format!("{:.0} gCO2/kWh ({})", g, country[row]))
            .unwrap_or_default();

        let values = [
            escape_html(&company[row]),
            escape_html(&technology[row]),
            escape_html(&species[row]),
            escape_html(&country[row]),
            link(&location_source[row], &location[row]),
            escape_html(&status_text),
            escape_html(&capacity),
            link(&info_link[row], &latest_text),
            escape_html(&range_text(elec_low_gwh, elec_high_gwh, "GWh")),
            link(CARBON_INTENSITY_LINK, &intensity_text),
            escape_html(&range_text(carbon_low[row], carbon_high[row], labels.carbon_unit)),
        ];
        let rows: String = labels
            .aliases
            .iter()
            .zip(values.iter())
            .map(|(alias, value)| {
                format!("<tr><th>{}</th><td>{}</td></tr>", escape_html(alias), value)
            })
            .collect();

        farms.push(Farm {
            lat,
            lng,
            status: status_index(&status[row]),
            elec_mid: mid(elec_low_gwh, elec_high_gwh),
            carbon_mid: mid(carbon_low[row], carbon_high[row]),
            popup: format!(r#"<table class="farm-popup">{}</table>"#, rows),
        });
    }
    Ok(farms)
}

/// Embed JSON inside a `<script>` element.
fn script_json(value: &serde_json::Value) -> Result<String, BuildError> {
    serde_json::to_string(value)
        .map(|s| s.replace("</", "<\\/"))
        .map_err(|e| BuildError::Shape(format!("cannot encode map data: {}", e)))
}

fn legend_html(labels: &Labels, args: &RasBubbleMapArgs) -> String {
    let swatches = |shades: &[&str; 3]| -> String {
        shades
            .iter()
            .zip(labels.statuses.iter())
            .map(|(color, status)| {
                format!(
                    "<li><span style='background:{};opacity:0.7;'></span>{}</li>",
                    color,
                    escape_html(status)
                )
            })
            .collect()
    };
    format!(
        concat!(
            "<div id='maplegend' class='maplegend'>",
            "<div class='legend-subtitle'>{subtitle}</div>",
            "<div class='legend-title'>{elec}</div>",
            "<ul class='legend-labels'>{elec_items}</ul>",
            "<div class='legend-title'>{carbon}</div>",
            "<ul class='legend-labels'>{carbon_items}</ul>",
            "<ul class='legend-notes'><li>{note1}</li><li>{note2}</li>",
            "<li><a href='https://pinkbombs.org/about'>{methodology}</a></li></ul>",
            "</div>"
        ),
        subtitle = escape_html(labels.legend_subtitle),
        elec = escape_html(&args.elec_layer),
        elec_items = swatches(&SHADES_SALMON),
        carbon = escape_html(&args.carbon_layer),
        carbon_items = swatches(&SHADES_BROWN),
        note1 = escape_html(labels.size_note[0]),
        note2 = escape_html(labels.size_note[1]),
        methodology = escape_html(labels.methodology),
    )
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="__LANG__">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
html, body { width: 100%; height: 100%; margin: 0; padding: 0; }
#map { position: absolute; top: __MAP_TOP__; bottom: 0; left: 0; right: 0; }
.layer-switch { background: white; padding: 6px 10px; border-radius: 5px; box-shadow: 0 1px 5px rgba(0,0,0,0.4); font: 12px sans-serif; }
.layer-switch label { display: block; }
.scroll-toggle { width: 30px; height: 30px; background: white; border: 2px solid rgba(0,0,0,0.2); border-radius: 4px; cursor: pointer; }
.scroll-toggle.active { background: #f4f4f4; }
.farm-popup { background-color: #F0EFEF; border-radius: 3px; }
.farm-popup th { text-align: left; padding-right: 6px; }
.maplegend { position: absolute; z-index: 9999; border: 2px solid grey; background-color: rgba(255, 255, 255, 0.8); border-radius: 6px; padding: 10px; font-size: 14px; left: 20px; bottom: 20px; }
.maplegend .legend-title { text-align: left; margin-bottom: 5px; font-weight: bold; font-size: 90%; }
.maplegend ul { margin: 0 0 5px 0; padding: 0; list-style: none; }
.maplegend ul li { font-size: 80%; line-height: 18px; margin-bottom: 2px; }
.maplegend ul.legend-labels li span { display: block; float: left; height: 16px; width: 30px; margin-right: 5px; border: 1px solid #999; }
.maplegend a { color: #777; }
</style>
</head>
<body>
__TITLE__
<div id="map"></div>
<div id="layer-switch" class="layer-switch">
<strong>__GROUP_TITLE__</strong>
<label><input type="radio" name="farm-layer" value="elec" checked> __ELEC_LAYER__</label>
<label><input type="radio" name="farm-layer" value="carbon"> __CARBON_LAYER__</label>
</div>
__LEGEND__
<script>
var map = L.map('map', {center: [0, 0], zoom: 2, minZoom: 2, maxZoom: 12, zoomControl: true, scrollWheelZoom: false});
L.tileLayer('https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png', {
  attribution: '&copy; OpenStreetMap contributors &copy; CARTO',
  subdomains: 'abcd',
  maxZoom: 20
}).addTo(map);

var farms = __FARMS__;
var shades = __SHADES__;

function farmLayer(key) {
  var group = L.featureGroup();
  farms.forEach(function (farm) {
    var color = shades[key][farm.status];
    L.circleMarker([farm.lat, farm.lng], {
      radius: farm[key], weight: 2, color: color, fillColor: color, fillOpacity: 0.6, opacity: 0.8
    }).bindPopup(farm.popup, {maxWidth: 800}).addTo(group);
  });
  return group;
}

var layers = {elec: farmLayer('elec'), carbon: farmLayer('carbon')};
layers.elec.addTo(map);

var switcher = L.control({position: 'topright'});
switcher.onAdd = function () {
  var div = document.getElementById('layer-switch');
  L.DomEvent.disableClickPropagation(div);
  div.querySelectorAll('input').forEach(function (input) {
    input.addEventListener('change', function () {
      Object.keys(layers).forEach(function (key) { map.removeLayer(layers[key]); });
      layers[input.value].addTo(map);
    });
  });
  return div;
};
switcher.addTo(map);

var toggler = L.control({position: 'topleft'});
toggler.onAdd = function () {
  var button = L.DomUtil.create('button', 'scroll-toggle');
  button.type = 'button';
  button.title = __SCROLL_TOGGLE__;
  button.innerHTML = '&#8597;';
  L.DomEvent.on(button, 'click', function (event) {
    L.DomEvent.stop(event);
    if (map.scrollWheelZoom.enabled()) {
      map.scrollWheelZoom.disable();
      button.classList.remove('active');
    } else {
      map.scrollWheelZoom.enable();
      button.classList.add('active');
    }
  });
  return button;
};
toggler.addTo(map);
</script>
</body>
</html>
"#;

/// Substitute every `__KEY__` placeholder in one left-to-right pass.
/// Inserted values are never scanned for placeholders.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find("__") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push_str("__");
                rest = &tail[2..];
            }
        }
    }
    out.push_str(rest);
    out
}

pub(crate) fn ras_bubble_map(dataset: &Dataset, args: &RasBubbleMapArgs) -> BuildResult<String> {
    let labels = if args.french { &FRENCH } else { &ENGLISH };
    let farms = collect_farms(dataset, labels)?;

    let elec_scale = RadiusScale::fit(
        &farms.iter().map(|f| f.elec_mid).collect::<Vec<_>>(),
        ELEC_RADIUS,
    );
    let carbon_scale = RadiusScale::fit(
        &farms.iter().map(|f| f.carbon_mid).collect::<Vec<_>>(),
        CARBON_RADIUS,
    );

    let features: Vec<serde_json::Value> = farms
        .iter()
        .map(|farm| {
            json!({
                "lat": farm.lat,
                "lng": farm.lng,
                "status": farm.status,
                "elec": elec_scale.radius(farm.elec_mid),
                "carbon": carbon_scale.radius(farm.carbon_mid),
                "popup": farm.popup,
            })
        })
        .collect();
    tracing::debug!(farms = features.len(), french = args.french, "Rendering RAS map");

    let title = match (&args.title, args.add_title_legend) {
        (Some(title), _) => Some(title.as_str()),
        (None, true) => Some(labels.default_title),
        (None, false) => None,
    };
    let title_html = title
        .map(|t| {
            format!(
                r#"<h3 align="center" style="font-size:16px;margin:8px 0"><b>{}</b></h3>"#,
                escape_html(t)
            )
        })
        .unwrap_or_default();
    let legend = if args.add_title_legend {
        legend_html(labels, args)
    } else {
        String::new()
    };

    let scroll_toggle = script_json(&json!(labels.scroll_toggle))?;
    let shades = script_json(&json!({"elec": SHADES_SALMON, "carbon": SHADES_BROWN}))?;
    let farms_json = script_json(&serde_json::Value::Array(features))?;
    let page = fill_template(
        PAGE_TEMPLATE,
        &[
            ("__LANG__", if args.french { "fr" } else { "en" }),
            ("__MAP_TOP__", if title.is_some() { "48px" } else { "0" }),
            ("__TITLE__", title_html.as_str()),
            ("__GROUP_TITLE__", escape_html(&args.group_title).as_str()),
            ("__ELEC_LAYER__", escape_html(&args.elec_layer).as_str()),
            ("__CARBON_LAYER__", escape_html(&args.carbon_layer).as_str()),
            ("__LEGEND__", legend.as_str()),
            ("__SCROLL_TOGGLE__", scroll_toggle.as_str()),
            ("__SHADES__", shades.as_str()),
            ("__FARMS__", farms_json.as_str()),
        ],
    );
    Ok(page)
}
