use async_trait::async_trait;
use cbt_domain::{ActionPlanData, ChallengeData, CoreBeliefData, EmotionData, RationalThoughtData, SchemaModeData,
                 SessionData, SituationData, StepId, StepPayload, ThoughtData, STEP_ORDER};
use cbt_workflow::{DiaryFlow, HydrationOutcome, RemoteSink};
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// Sink "remoto" de la demo: agrega cada diario terminado como una línea
/// JSON en `diaries.jsonl` dentro del directorio de datos.
struct JsonlArchive {
    path: PathBuf,
}

#[async_trait]
impl RemoteSink for JsonlArchive {
    async fn on_change(&self, _data: &SessionData) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_complete(&self, data: &SessionData) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut line = serde_json::to_string(data)?;
        line.push('\n');
        let mut file = tokio::fs::OpenOptions::new().create(true).append(true).open(&self.path).await?;
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }
}

/// Pequeño menú interactivo para rellenar un diario paso a paso. El
/// borrador se guarda cifrado en `CBT_DRAFT_DIR` tras cada edición y se
/// ofrece reanudarlo al volver a abrir el programa.
///
/// Variables de entorno (o `.env`): `CBT_DRAFT_DIR`, `CBT_DRAFT_KEY`,
/// `CBT_DRAFT_SECRET` (sin secreto no hay guardado local).
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let gateway = Arc::new(cbt_persistence::new_from_env());
    if gateway.config().secret.is_none() {
        eprintln!("Aviso: CBT_DRAFT_SECRET no definido; el borrador no se guardará localmente.");
    }
    let archive = Arc::new(JsonlArchive { path: gateway.config().data_dir.join("diaries.jsonl") });
    let flow = DiaryFlow::new(gateway.clone(), archive);

    if gateway.has_draft() {
        let when = gateway.draft_timestamp().map(|t| t.to_rfc3339()).unwrap_or_else(|| "-".into());
        let answer = prompt(&format!("Hay un borrador guardado ({}). ¿Reanudar? [S/n]: ", when))?;
        if answer.trim().eq_ignore_ascii_case("n") {
            flow.start_fresh();
        }
    }
    match flow.hydrate().await? {
        HydrationOutcome::Applied { start_step, .. } => println!("Borrador reanudado en '{}'.", start_step),
        HydrationOutcome::Merged { start_step, .. } => {
            println!("Borrador fusionado con los cambios recientes; se continúa en '{}'.", start_step)
        }
        HydrationOutcome::Failed { message } => {
            eprintln!("No se pudo leer el borrador: {}", message);
            let answer = prompt("¿Descartarlo y empezar de nuevo? [S/n]: ")?;
            if !answer.trim().eq_ignore_ascii_case("n") {
                flow.discard_draft_and_restart()?;
            }
        }
        _ => {}
    }

    loop {
        print!("{}", status_text(&flow)?);
        println!("1) Editar paso actual (autoguardado)");
        println!("2) Completar paso actual");
        println!("3) Siguiente");
        println!("4) Anterior");
        println!("5) Ir a paso");
        println!("6) Ver datos de la sesión");
        println!("7) Reiniciar");
        println!("8) Salir");
        if flow.error()?.is_some() {
            println!("9) Descartar aviso de error");
        }
        let choice = prompt("Elige una opción: ")?;
        match choice.trim() {
            "1" | "2" => {
                let step = flow.current_step()?;
                if step.is_complete() {
                    println!("El diario ya está completo.");
                    continue;
                }
                let payload = match read_payload(step) {
                    Ok(p) => p,
                    Err(e) => {
                        eprintln!("Entrada inválida: {}", e);
                        continue;
                    }
                };
                let res = if choice.trim() == "1" {
                    flow.update_step(step, payload).await
                } else {
                    flow.complete_step(step, payload).await
                };
                if let Err(e) = res {
                    eprintln!("{}", e);
                }
            }
            "3" => {
                flow.go_next()?;
            }
            "4" => {
                flow.go_previous()?;
            }
            "5" => {
                let target = prompt("Paso (p. ej. core-belief): ")?;
                match target.parse::<StepId>() {
                    Ok(step) => {
                        flow.go_to_step(step)?;
                    }
                    Err(e) => eprintln!("{}", e),
                }
            }
            "6" => println!("{}", serde_json::to_string_pretty(&flow.session_data()?)?),
            "7" => {
                flow.reset()?;
                println!("Sesión reiniciada.");
            }
            "8" => {
                flow.unmount();
                break;
            }
            "9" => flow.clear_error()?,
            _ => println!("Opción inválida"),
        }
    }

    Ok(())
}

/// Cabecera de estado. Sólo lee: el aviso de error se descarta con la
/// opción del menú.
fn status_text(flow: &DiaryFlow) -> Result<String, Box<dyn Error>> {
    let progress = flow.progress()?;
    let mut out = String::from("\n== Diario TCC ==\n");
    if progress.is_complete {
        out.push_str(&format!("Paso: completo ({} de {} pasos completados)\n",
                              progress.completed_count, progress.total_steps));
    } else {
        out.push_str(&format!("Paso {}/{}: {} ({}% completado)\n",
                              progress.current_step_number,
                              progress.total_steps,
                              flow.current_step()?,
                              progress.percentage()));
    }
    if let Some(err) = flow.error()? {
        out.push_str(&format!("[!] Error al guardar: {} (opción 9 para descartar)\n", err));
    }
    Ok(out)
}

fn prompt(msg: &str) -> Result<String, Box<dyn Error>> {
    print!("{}", msg);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim_end_matches(['\r', '\n']).to_string())
}

fn rating(msg: &str) -> Result<u8, Box<dyn Error>> {
    let raw = prompt(msg)?;
    if raw.trim().is_empty() {
        return Ok(0);
    }
    Ok(raw.trim().parse::<u8>()?)
}

fn optional(msg: &str) -> Result<Option<String>, Box<dyn Error>> {
    let raw = prompt(msg)?;
    Ok(Some(raw.trim().to_string()).filter(|s| !s.is_empty()))
}

/// Lee líneas hasta una vacía.
fn lines(msg: &str) -> Result<Vec<String>, Box<dyn Error>> {
    println!("{} (línea vacía para terminar)", msg);
    let mut out = Vec::new();
    loop {
        let line = prompt("> ")?;
        if line.trim().is_empty() {
            return Ok(out);
        }
        out.push(line.trim().to_string());
    }
}

fn read_emotions() -> Result<EmotionData, Box<dyn Error>> {
    Ok(EmotionData { fear: rating("Miedo (0-10): ")?,
                     anger: rating("Ira (0-10): ")?,
                     sadness: rating("Tristeza (0-10): ")?,
                     shame: rating("Vergüenza (0-10): ")?,
                     guilt: rating("Culpa (0-10): ")?,
                     joy: rating("Alegría (0-10): ")?,
                     anxiety: rating("Ansiedad (0-10): ")?,
                     other: optional("Otra emoción (opcional): ")?,
                     other_intensity: None })
}

fn read_payload(step: StepId) -> Result<StepPayload, Box<dyn Error>> {
    let payload = match step {
        StepId::Situation => StepPayload::Situation(SituationData { situation: prompt("¿Qué pasó?: ")?,
                                                                    date: prompt("Fecha (AAAA-MM-DD): ")? }),
        StepId::Emotions => StepPayload::Emotions(read_emotions()?),
        StepId::Thoughts => {
            let mut thoughts = Vec::new();
            for thought in lines("Pensamientos automáticos")? {
                let credibility = rating(&format!("Credibilidad de '{}' (0-100): ", thought))?;
                thoughts.push(ThoughtData { thought, credibility });
            }
            StepPayload::Thoughts(thoughts)
        }
        StepId::CoreBelief => StepPayload::CoreBelief(CoreBeliefData { belief: prompt("Creencia central: ")?,
                                                                       credibility: rating("Credibilidad (0-100): ")? }),
        StepId::ChallengeQuestions => {
            let mut answers = Vec::new();
            for question in lines("Preguntas de desafío")? {
                let answer = prompt(&format!("Respuesta a '{}': ", question))?;
                answers.push(ChallengeData { question, answer });
            }
            StepPayload::ChallengeQuestions(answers)
        }
        StepId::RationalThoughts => {
            let mut rational = Vec::new();
            for thought in lines("Pensamientos racionales")? {
                let confidence = rating(&format!("Confianza en '{}' (0-10): ", thought))?;
                rational.push(RationalThoughtData { thought, confidence });
            }
            StepPayload::RationalThoughts(rational)
        }
        StepId::SchemaModes => {
            let modes = lines("Modos de esquema activos")?.into_iter()
                                                          .map(|name| SchemaModeData { id: name.to_lowercase()
                                                                                               .replace(' ', "-"),
                                                                                       name,
                                                                                       description: String::new(),
                                                                                       selected: true,
                                                                                       intensity: None })
                                                          .collect();
            StepPayload::SchemaModes(modes)
        }
        StepId::Actions => {
            println!("Emociones tras el ejercicio:");
            StepPayload::Actions(ActionPlanData { final_emotions: read_emotions()?,
                                                  new_behavior: optional("Nueva conducta (opcional): ")?,
                                                  alternative_response: optional("Respuesta alternativa (opcional): ")? })
        }
        StepId::FinalEmotions => StepPayload::FinalEmotions(read_emotions()?),
        StepId::Complete => return Err(format!("'{}' no tiene datos; pasos: {:?}", step, STEP_ORDER).into()),
    };
    Ok(payload)
}
