//! Server-side HTML for the dashboard.

use crate::artifact::Artifact;
use crate::predict::{
    FAT_OPTIONS, MilkInput, ODOR_OPTIONS, Prediction, TASTE_OPTIONS, TURBIDITY_OPTIONS,
};

pub const PH_RANGE: (f64, f64) = (3.0, 9.5);
pub const TEMPERATURE_RANGE: (f64, f64) = (34.0, 90.0);
pub const COLOUR_RANGE: (f64, f64) = (240.0, 255.0);

const STYLE: &str = r#"
body { margin: 0; min-height: 100vh; font-family: sans-serif; color: #fff;
       background: linear-gradient(rgba(0,0,0,0.7), rgba(0,0,0,0.85)), #1b1b1b; }
main { max-width: 1100px; margin: 0 auto; padding: 24px; }
.main-title { text-align: center; font-size: 60px; font-weight: 900; margin-bottom: 0;
              background: linear-gradient(90deg, #bf953f, #fcf6ba, #d4af37);
              -webkit-background-clip: text; -webkit-text-fill-color: transparent; }
.subtitle { text-align: center; color: #d4af37; letter-spacing: 3px; }
.row { display: flex; gap: 24px; }
.row > * { flex: 1; }
.metric .label { font-size: 14px; color: #bbb; }
.metric .value { font-size: 32px; }
.glass-card { background: rgba(255,255,255,0.05); border: 1px solid rgba(212,175,55,0.3);
              border-radius: 20px; padding: 25px; margin: 24px 0; }
button { background: linear-gradient(45deg, #d4af37, #fcf6ba); color: black; font-weight: bold;
         border-radius: 50px; border: none; width: 100%; padding: 10px; font-size: 18px; }
.grade { padding: 30px; border-radius: 20px; text-align: center; }
.grade h1 { color: black; margin: 0; }
.bar-row { display: flex; align-items: center; margin: 6px 0; }
.bar-name { width: 110px; text-align: right; padding-right: 10px; }
.bar { background: #d4af37; height: 18px; }
"#;

/// Escapes text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
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

/// Renders the full page. `prediction` is `None` while awaiting input.
pub fn render(artifact: &Artifact, input: &MilkInput, prediction: Option<&Prediction>) -> String {
    let mut html = String::new();
    write_page(&mut html, artifact, input, prediction);
    html
}

fn write_page(
    html: &mut String,
    artifact: &Artifact,
    input: &MilkInput,
    prediction: Option<&Prediction>,
) {
    html.push_str(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
         <title>MilkVision Pro</title><style>",
    );
    html.push_str(STYLE);
    html.push_str("</style></head><body><main>");
    html.push_str(
        "<h1 class=\"main-title\">MILK QUALITY ANALYZER</h1>\
         <p class=\"subtitle\">AI-POWERED CLASSIFICATION ENGINE</p>",
    );
    write_metrics(html, artifact);
    write_form(html, input);
    if let Some(prediction) = prediction {
        write_result(html, artifact, prediction);
    }
    html.push_str("</main></body></html>");
}

fn write_metrics(html: &mut String, artifact: &Artifact) {
    let metric = |label: &str, value: &str| {
        format!(
            "<div class=\"metric\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>",
            escape_html(label),
            escape_html(value)
        )
    };
    let accuracy = format!("{:.2}%", artifact.metrics.accuracy * 100.0);
    let parameters = format!(
        "{} rounds, {} features",
        artifact.model.n_rounds(),
        artifact.model.n_features()
    );
    html.push_str("<div class=\"row\">");
    html.push_str(&metric("Model Accuracy", &accuracy));
    html.push_str(&metric("Model Task", "Classification"));
    html.push_str(&metric("Parameters", &parameters));
    html.push_str("</div>");
}

fn write_slider(
    html: &mut String,
    name: &str,
    label: &str,
    (min, max): (f64, f64),
    step: f64,
    value: f64,
) {
    html.push_str(&format!(
        "<label>{label}<br><input type=\"range\" name=\"{name}\" min=\"{min}\" max=\"{max}\" \
         step=\"{step}\" value=\"{value}\" oninput=\"this.nextElementSibling.value=this.value\">\
         <output>{value}</output></label><br>"
    ));
}

fn write_radio(
    html: &mut String,
    name: &str,
    label: &str,
    options: &[&str; 2],
    selected: &str,
) {
    html.push_str(&format!("<fieldset><legend>{label}</legend>"));
    for option in options {
        let checked = if *option == selected { " checked" } else { "" };
        let option = escape_html(option);
        html.push_str(&format!(
            "<label><input type=\"radio\" name=\"{name}\" value=\"{option}\"{checked}> {option}</label> "
        ));
    }
    html.push_str("</fieldset>");
}

fn write_form(html: &mut String, input: &MilkInput) {
    html.push_str(
        "<form method=\"post\" action=\"/analyze\"><div class=\"glass-card row\"><div>\
         <p><strong>Chemical Profile</strong></p>",
    );
    write_slider(html, "ph", "pH Level", PH_RANGE, 0.1, input.ph);
    write_slider(
        html,
        "temperature",
        "Temperature (&deg;C)",
        TEMPERATURE_RANGE,
        1.0,
        input.temperature,
    );

    html.push_str("</div><div><p><strong>Sensory Profile</strong></p>");
    write_radio(html, "taste", "Taste Quality", &TASTE_OPTIONS, &input.taste);
    write_radio(html, "odor", "Odor Quality", &ODOR_OPTIONS, &input.odor);
    write_radio(html, "fat", "Fat Content", &FAT_OPTIONS, &input.fat);

    html.push_str("</div><div><p><strong>Visual Profile</strong></p>");
    write_radio(
        html,
        "turbidity",
        "Turbidity",
        &TURBIDITY_OPTIONS,
        &input.turbidity,
    );
    let (min, max) = COLOUR_RANGE;
    html.push_str(&format!(
        "<label>Colour Value<br><input type=\"number\" name=\"colour\" min=\"{min}\" \
         max=\"{max}\" step=\"1\" value=\"{}\"></label>",
        input.colour
    ));
    html.push_str("</div></div><button type=\"submit\">ANALYZE MILK QUALITY</button></form>");
}

fn write_result(html: &mut String, artifact: &Artifact, prediction: &Prediction) {
    html.push_str(&format!(
        "<hr><div class=\"row\"><div><h3>Prediction Result</h3>\
         <div class=\"grade\" style=\"background: {};\"><h1>GRADE: {}</h1></div></div>",
        prediction.color(),
        escape_html(&prediction.grade)
    ));

    html.push_str("<div><h3>Decision Driver</h3>");
    let top = artifact
        .importances
        .iter()
        .map(|fi| fi.importance)
        .fold(0.0, f64::max);
    for fi in &artifact.importances {
        let width = if top > 0.0 {
            fi.importance / top * 100.0
        } else {
            0.0
        };
        html.push_str(&format!(
            "<div class=\"bar-row\"><span class=\"bar-name\">{}</span>\
             <div class=\"bar\" style=\"width: {width:.1}%;\" title=\"{:.4}\"></div></div>",
            escape_html(&fi.name),
            fi.importance
        ));
    }
    html.push_str("</div></div>");
}
