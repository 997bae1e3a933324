//! Prompts for story → scene splitting. The model must reply with
//! `{"scenes": [{"description": "...", "dialogue": "..." | null}]}`.

pub const SCENE_SPLIT_SYSTEM: &str = "\
You are a comic strip storyboard writer. You break a short story into consecutive \
panels. Each panel has a visual description an illustrator can draw without \
further context, and optionally one short line of dialogue spoken in that panel.\n\
\n\
Respond with valid JSON only: {\"scenes\": [{\"description\": \"...\", \"dialogue\": \"...\"}]}\n\
Use null for dialogue when nobody speaks. Do NOT add any explanation outside the JSON object.";

pub const SCENE_SPLIT_PROMPT_TEMPLATE: &str = "\
Break the following story into at most {max_scenes} comic panels, in story order.\n\
\n\
STORY: {story}\n\
\n\
RULES:\n\
1. One panel per distinct moment; keep events in story order\n\
2. Descriptions are concrete and visual: who, where, what they are doing\n\
3. Repeat each character's key visual traits in every panel they appear in\n\
4. Dialogue is at most 12 words and must fit the moment; omit it rather than invent filler\n\
5. Never exceed {max_scenes} panels";
