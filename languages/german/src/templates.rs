use kartei_core::{CardTemplate, TemplateError, TemplateLoader, TemplatePart};

/// Kind key of the contextual vocabulary card
pub const CONTEXTUAL_KIND: &str = "german_contextual";

const CONTEXTUAL_FRONT: &str = include_str!("../templates/german_contextual/front.html");
const CONTEXTUAL_BACK: &str = include_str!("../templates/german_contextual/back.html");
const CONTEXTUAL_STYLE: &str = include_str!("../templates/german_contextual/style.css");

/// Templates compiled into the binary
pub struct EmbeddedTemplates;

impl TemplateLoader for EmbeddedTemplates {
    fn load(&self, kind: &str, part: TemplatePart) -> Result<String, TemplateError> {
        let content = match (kind, part) {
            (CONTEXTUAL_KIND, TemplatePart::Front) => CONTEXTUAL_FRONT,
            (CONTEXTUAL_KIND, TemplatePart::Back) => CONTEXTUAL_BACK,
            (CONTEXTUAL_KIND, TemplatePart::Style) => CONTEXTUAL_STYLE,
            _ => {
                return Err(TemplateError::NotFound {
                    kind: kind.to_string(),
                    part: part.file_name(),
                });
            }
        };

        Ok(content.to_string())
    }
}

/// The bundled contextual card template
pub fn contextual_template() -> CardTemplate {
    CardTemplate::new(CONTEXTUAL_FRONT, CONTEXTUAL_BACK).with_css(CONTEXTUAL_STYLE)
}
