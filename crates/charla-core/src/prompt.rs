//! Prompt composition.
//!
//! The completion service receives a single flat prompt string. It is built
//! from, in order: the persona directive for the session mode, the
//! continuation clause for the last proposed topic, the visual-context note
//! for an attachment, and the role-tagged user turn.

use crate::session::{AttachmentRef, ConversationMode, Session};

const SHARED_DIRECTIVE: &str = "Responde en español en 3 a 5 frases cortas separadas por saltos de línea o viñetas.
Sé abierto a cualquier tema, con humor ligero y cercanía de amigo de confianza.
Limita tus respuestas a ~90 palabras; casi nunca pases de 150. Si lo necesitas, usa metáforas o resúmenes.
Mantén las ideas compactas y termina con 1 o 2 preguntas para seguir conversando.
Si hay una imagen adjunta, menciónala como contexto visual aunque no puedas verla. Usa emojis con moderación.";

const INSTRUCTIVE_TONE: &str = "Modo profesor: especializado en computación cuántica (qubits), AWS (servicios cloud), machine learning, IA y algoritmos, ESP32, Arduino, física, gramática en inglés y estoicismo. Tono didáctico, estructura en pasos breves, ejemplos simples y llamados a la acción. Inicia proponiendo un tema aleatorio de esas áreas, pero permanece abierto a cualquier otro tema.";

const SUPPORTIVE_TONE: &str = "Modo amigo: tono empático, validando emociones, apoyo emocional y comentarios cercanos. Propón al inicio algún tema ligero y cambia de rumbo si la persona lo desea. motivalo a seguir conversando con preguntas abiertas. pero a veces puedes decir cosas absurdas para que se rian con sus ocurrencias , por ejemplo \"aconseja volver con el ex\" o \"comer helado en el desayuno\".";

/// Role tag preceding the user's utterance.
pub const USER_TAG: &str = "Usuario:";
/// Role tag the service is expected to continue from.
pub const ASSISTANT_TAG: &str = "Asistente:";

/// Persona directive for a mode: the shared rules followed by the tone.
pub fn persona_directive(mode: ConversationMode) -> String {
    let tone = match mode {
        ConversationMode::Instructive => INSTRUCTIVE_TONE,
        ConversationMode::Supportive => SUPPORTIVE_TONE,
    };
    format!("{SHARED_DIRECTIVE}\n{tone}")
}

/// Clause asking the service to keep explaining `topic` on a bare "yes".
pub fn continuation_clause(topic: &str) -> String {
    format!(
        "Último tema propuesto: {topic}. Si el usuario dice \"sí\", \"dale\", \"continúa\" o similar sin más contexto, continúa explicando ese tema con un mini resumen (max ~90 palabras)."
    )
}

/// One-line note naming an attached image.
pub fn visual_context_note(attachment: &AttachmentRef) -> String {
    format!(
        "Contexto visual: {}. Si puedes, usa el campo imageData para razonarlo.",
        attachment.name
    )
}

/// Builds the prompt for one user turn.
///
/// Pure: reads only `session.mode` and `session.last_topic` plus the
/// arguments, so identical inputs always produce the identical string.
pub fn compose(session: &Session, user_text: &str, attachment: Option<&AttachmentRef>) -> String {
    let mut prompt = persona_directive(session.mode);

    if let Some(topic) = session.last_topic.as_deref().filter(|t| !t.is_empty()) {
        prompt.push('\n');
        prompt.push_str(&continuation_clause(topic));
    }

    if let Some(attachment) = attachment {
        prompt.push('\n');
        prompt.push_str(&visual_context_note(attachment));
    }

    prompt.push_str("\n\n");
    prompt.push_str(USER_TAG);
    prompt.push(' ');
    prompt.push_str(user_text);
    prompt.push('\n');
    prompt.push_str(ASSISTANT_TAG);
    prompt
}
