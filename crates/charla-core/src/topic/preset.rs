//! Default topic presets.
//!
//! The catalog the assistant proposes opening topics from when no custom
//! catalog is configured.

use super::model::{Topic, TopicCatalog};

/// Returns the built-in topic catalog.
///
/// Every preset topic carries three opening questions.
pub fn default_catalog() -> TopicCatalog {
    TopicCatalog::new(vec![
        Topic::new(
            "computación cuántica y qubits",
            [
                "¿Te gustaría ver cómo se representa un qubit en la esfera de Bloch?",
                "¿Probamos a armar un circuito con puertas Hadamard y CNOT?",
                "¿Quieres comparar decoherencia vs ruido clásico?",
            ],
        ),
        Topic::new(
            "servicios de AWS en la nube",
            [
                "¿Te muestro cómo montar un backend serverless rápido?",
                "¿Vemos cómo asegurar buckets S3 con políticas mínimas?",
                "¿Hacemos un plan para desplegar con ECS/Fargate?",
            ],
        ),
        Topic::new(
            "algoritmos de machine learning",
            [
                "¿Comparamos regresión lineal vs árboles para un caso sencillo?",
                "¿Exploramos cómo tunear hiperparámetros con grid o bayesiano?",
                "¿Quieres revisar cómo evitar overfitting con regularización?",
            ],
        ),
        Topic::new(
            "trucos con ESP32",
            [
                "¿Te enseño a leer sensores y mandar datos por WiFi en minutos?",
                "¿Probamos deep-sleep para ahorrar batería?",
                "¿Hacemos un mini servidor web para controlar LEDs?",
            ],
        ),
        Topic::new(
            "proyectos con Arduino",
            [
                "¿Armamos un plan para un robot evita-obstáculos?",
                "¿Quieres aprender a usar PWM para motores o LEDs?",
                "¿Vemos cómo leer múltiples sensores analógicos con poco ruido?",
            ],
        ),
        Topic::new(
            "física divertida",
            [
                "¿Te interesa repasar relatividad en 3 ideas clave?",
                "¿Hablamos de por qué cae una pluma al vacío igual que un martillo?",
                "¿Quieres ejemplos rápidos de conservación de energía y momento?",
            ],
        ),
        Topic::new(
            "gramática en inglés",
            [
                "¿Practicamos tiempos verbales con ejemplos cortos?",
                "¿Quieres tips para evitar errores comunes con preposiciones?",
                "¿Te paso frases útiles para sonar más natural?",
            ],
        ),
        Topic::new(
            "estoicismo práctico",
            [
                "¿Probamos un ejercicio breve de dicotomía de control?",
                "¿Te comparto 3 frases de Epicteto con aplicación diaria?",
                "¿Hacemos un plan de journaling en 2 minutos?",
            ],
        ),
        Topic::new(
            "redes neuronales y IA",
            [
                "¿Quieres comparar CNNs vs transformers en pocas líneas?",
                "¿Vemos cómo elegir función de pérdida según la tarea?",
                "¿Te muestro un flujo rápido de entrenamiento y validación?",
            ],
        ),
        Topic::new(
            "consejos de estudio",
            [
                "¿Te interesa una rutina Pomodoro corta para hoy?",
                "¿Quieres tips para notas tipo Cornell en 3 pasos?",
                "¿Vemos cómo espaciar repasos para recordar más?",
            ],
        ),
        Topic::new(
            "IA generativa y prompts",
            [
                "¿Probamos un framework corto para escribir mejores prompts?",
                "¿Quieres ver cómo estructurar few-shot vs zero-shot?",
                "¿Hablamos de cómo evaluar salidas sin dataset grande?",
            ],
        ),
        Topic::new(
            "optimización de código en Python",
            [
                "¿Medimos rendimiento con timeit y perfilador simple?",
                "¿Te muestro trucos con vectorización en NumPy?",
                "¿Quieres comparar multiproceso vs async para IO?",
            ],
        ),
        Topic::new(
            "ciberseguridad básica",
            [
                "¿Vemos prácticas rápidas para contraseñas y 2FA?",
                "¿Quieres tips para detectar phishing?",
                "¿Hablamos de cómo cifrar y respaldar datos personales?",
            ],
        ),
        Topic::new(
            "bases de datos y SQL",
            [
                "¿Te enseño índices y consultas rápidas en 3 ejemplos?",
                "¿Probamos joins con un mini caso práctico?",
                "¿Vemos cómo normalizar sin complicarnos?",
            ],
        ),
        Topic::new(
            "control de versiones con Git",
            [
                "¿Te explico ramas y merges con un flujo simple?",
                "¿Quieres atajos para revertir sin miedo?",
                "¿Hacemos un plan de branching para tu equipo?",
            ],
        ),
    ])
}
