//! Prompt text and the manifest response schema.

use cinereel_core::SceneRecord;
use serde_json::{Value, json};

/// Required fields of every manifest entry, in schema order.
pub const MANIFEST_FIELDS: [&str; 9] = [
    "sceneNumber",
    "title",
    "location",
    "timeOfDay",
    "visual",
    "action",
    "emotion",
    "dialogue",
    "cinematicNotes",
];

/// Response schema for the manifest call: an array of scene objects.
///
/// # Examples
///
/// ```
/// use cinereel_models::{manifest_schema, MANIFEST_FIELDS};
///
/// let schema = manifest_schema();
/// assert_eq!(schema["type"], "ARRAY");
/// assert_eq!(schema["items"]["required"].as_array().unwrap().len(), MANIFEST_FIELDS.len());
/// ```
pub fn manifest_schema() -> Value {
    let properties = MANIFEST_FIELDS
        .iter()
        .map(|field| {
            let kind = if *field == "sceneNumber" {
                "INTEGER"
            } else {
                "STRING"
            };
            ((*field).to_string(), json!({ "type": kind }))
        })
        .collect::<serde_json::Map<_, _>>();

    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": properties,
            "required": MANIFEST_FIELDS,
        }
    })
}

pub(crate) fn hero_analysis() -> &'static str {
    "You are a character designer. Study the reference images and write a precise \
     identity profile of this character: face shape, jawline and cheekbones, eye shape \
     and colour, hair texture and flow, build, and any distinctive marks. The profile \
     will be used to keep the character identical across many different scenes."
}

pub(crate) fn manifest(
    title: &str,
    synopsis: &str,
    hero_description: &str,
    visual_style: &str,
    count: u32,
    language: &str,
) -> String {
    format!(
        "You are a film director and screenwriter.\n\
         Title: \"{title}\"\n\
         Synopsis: \"{synopsis}\"\n\
         Character profile: \"{hero_description}\"\n\
         Visual style: \"{visual_style}\"\n\
         Language: \"{language}\"\n\n\
         Write exactly {count} scenes that follow a clear arc: introduction, rising action, \
         climax, resolution.\n\
         Every text field (title, location, time of day, visual, action, emotion, dialogue, \
         cinematic notes) must be written in {language}.\n\
         For each scene give its number, a title, a specific location, the time of day, a \
         visual description (lighting, composition, atmosphere), what the character does, the \
         emotional tone, one short line of dialogue, and cinematic notes (lens, camera \
         movement, sound).\n\
         Visual descriptions must not call for on-screen text, subtitles or speech bubbles.\n\
         Answer with JSON matching the schema."
    )
}

pub(crate) fn scene_frame(
    scene: &SceneRecord,
    hero_description: &str,
    visual_style: &str,
    remake_instruction: Option<&str>,
) -> String {
    let remake = remake_instruction
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(|r| format!("- Revision: {r}\n"))
        .unwrap_or_default();

    format!(
        "Cinematic production frame.\n\
         - Scene: {visual}\n\
         - Location: {location} at {time_of_day}\n\
         - Action: {action}\n\
         - Emotion: {emotion}\n\
         - Style: {visual_style}\n\
         - Camera: {notes}\n\
         {remake}\n\
         Do not draw any text, subtitles, letters, numbers, speech bubbles or watermarks.\n\
         Keep the character's face, hair and build identical to the attached reference \
         images and this profile: {hero_description}.\n\
         Cinematic lighting, professional colour grading, high detail.",
        visual = scene.visual,
        location = scene.location,
        time_of_day = scene.time_of_day,
        action = scene.action,
        emotion = scene.emotion,
        notes = scene.cinematic_notes,
    )
}

pub(crate) fn video(visual: &str, hero_description: &str) -> String {
    format!(
        "Animate this cinematic scene: {visual}. The character ({hero_description}) moves \
         naturally. Dramatic lighting, high resolution, 16:9. No text or watermarks."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SceneRecord {
        SceneRecord {
            scene_number: 1,
            title: "Dawn".to_string(),
            location: "Harbour".to_string(),
            time_of_day: "Sunrise".to_string(),
            visual: "Mist over the boats".to_string(),
            action: "She unties the rope".to_string(),
            emotion: "Hopeful".to_string(),
            dialogue: "Now or never.".to_string(),
            cinematic_notes: "35mm, slow dolly in".to_string(),
        }
    }

    #[test]
    fn remake_line_only_when_instruction_given() {
        let plain = scene_frame(&record(), "dna", "Anime", None);
        assert!(!plain.contains("Revision"));
        let blank = scene_frame(&record(), "dna", "Anime", Some("   "));
        assert!(!blank.contains("Revision"));
        let remake = scene_frame(&record(), "dna", "Anime", Some("make it rain"));
        assert!(remake.contains("- Revision: make it rain"));
        assert!(remake.contains("Mist over the boats"));
    }

    #[test]
    fn manifest_prompt_names_count_and_language() {
        let prompt = manifest("T", "S", "D", "Noir", 7, "Bahasa Indonesia");
        assert!(prompt.contains("exactly 7 scenes"));
        assert!(prompt.contains("written in Bahasa Indonesia"));
    }

    #[test]
    fn schema_marks_scene_number_as_integer() {
        let schema = manifest_schema();
        assert_eq!(schema["items"]["properties"]["sceneNumber"]["type"], "INTEGER");
        assert_eq!(schema["items"]["properties"]["dialogue"]["type"], "STRING");
    }
}
