mod chapel;

use chapel::{ChapelSession, Relic, UNLOCK_THRESHOLD};
use dotenv::dotenv;
use log::debug;
use teloxide::{
    dispatching::dialogue::InMemStorage,
    prelude::*,
    types::{ChatId, KeyboardButton, KeyboardMarkup, ParseMode},
};

type RoomDialogue = Dialogue<State, InMemStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum State {
    #[default]
    Start,
    ReceiveVisitorName,
    Inspecting {
        session: ChapelSession,
        position: usize,
    },
    Reviewing {
        session: ChapelSession,
    },
    Amending {
        session: ChapelSession,
        relic_id: String,
    },
}

#[tokio::main]
async fn main() {
    dotenv().expect("Failed to load .env file");

    pretty_env_logger::init();
    log::info!("Starting chapel room bot...");

    let bot = Bot::from_env();

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, InMemStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::ReceiveVisitorName].endpoint(receive_visitor_name))
            .branch(
                dptree::case![State::Inspecting { session, position }].endpoint(inspect_relics),
            )
            .branch(dptree::case![State::Reviewing { session }].endpoint(review_judgments))
            .branch(dptree::case![State::Amending { session, relic_id }].endpoint(amend_judgment)),
    )
    .dependencies(dptree::deps![InMemStorage::<State>::new()])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

const GREETING_TEXT: &str =
    "⛪ Welcome to the chapel! I am the keeper of its relics. Before you step inside, tell me your name.";

const KEY_TERMS_TEXT: &str = "<b>Key terms for this room</b>\n\n\
<b>Plausible</b> means possible or believable.\n\n\
A <b>reliquary</b> was a container in medieval churches used to keep <b>relics</b>, which were parts of saints' clothing or bones, that people thought were holy.\n\n\
<b>Anachronistic</b> means something placed in the wrong time period. In this room, you're checking whether an item could realistically exist in a <b>13th-14th century</b> Western European chapel.\n\n\
<b>Tips:</b>\n\
• Watch for technologies that didn't exist yet (e.g., printing press sheets in the 1300s).\n\
• Be careful with distant events that only arise later (e.g., Guadalupe 1531).\n\
• Some items are plausible but details can be off (materials, techniques, style).";

const INSTRUCTIONS_TEXT: &str = "<b>Instructions:</b> Inspect each item and decide if it is <b>plausible</b> for a 13th-14th century chapel in Western Europe. \
Press <b>Info</b> to read background notes. Select <b>Yes, plausible</b> or <b>No, dubious</b> for each relic, then review your judgments and press <b>Submit</b>. \
Get <b>5 or more</b> correct to unlock the Chapel Clue.";

const CHAPEL_CLUE: &str = "🔎 <b>Chapel Clue</b>: Three saints watch through windows high, \
Yet under the altar, rats slip by. A rope descends to air that chills, \
Follow it down where darkness stills.";

const ENTER_CHAPEL: &str = "Enter the chapel";
const YES_PLAUSIBLE: &str = "Yes, plausible";
const NO_DUBIOUS: &str = "No, dubious";
const INFO: &str = "Info";
const SUBMIT: &str = "Submit";
const RESET: &str = "Reset";
const CHOOSE_AN_OPTION: &str = "Please choose one of the options";

async fn start(bot: Bot, dialogue: RoomDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, GREETING_TEXT).await?;

    dialogue.update(State::ReceiveVisitorName).await?;
    Ok(())
}

async fn receive_visitor_name(bot: Bot, dialogue: RoomDialogue, msg: Message) -> HandlerResult {
    match msg.text() {
        Some(name) => {
            bot.send_message(
                msg.chat.id,
                format!("Pleased to meet you, {}! The relics await.", name),
            )
            .await?;
        }
        None => {
            bot.send_message(msg.chat.id, "Please introduce yourself with a text message")
                .await?;
            return Ok(());
        }
    }

    bot.send_message(msg.chat.id, KEY_TERMS_TEXT)
        .parse_mode(ParseMode::Html)
        .await?;

    let keyboard = KeyboardMarkup::new(vec![vec![KeyboardButton::new(ENTER_CHAPEL)]]);
    bot.send_message(msg.chat.id, INSTRUCTIONS_TEXT)
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboard)
        .await?;

    dialogue
        .update(State::Inspecting {
            session: ChapelSession::new(),
            position: 0,
        })
        .await?;
    Ok(())
}

async fn inspect_relics(
    bot: Bot,
    dialogue: RoomDialogue,
    (mut session, position): (ChapelSession, usize),
    msg: Message,
) -> HandlerResult {
    // The first message in this state is the "Enter the chapel" press, so
    // there is no judgment to record yet
    if position != 0 {
        let current = session.display_order()[position - 1].clone();
        match msg.text() {
            Some(YES_PLAUSIBLE) => {
                session.record_answer(&current.id, true)?;
            }
            Some(NO_DUBIOUS) => {
                session.record_answer(&current.id, false)?;
            }
            Some(INFO) => {
                session.open_inspection(&current.id)?;
                if let Some(inspected) = session.active_inspection() {
                    send_notes(&bot, msg.chat.id, inspected).await?;
                }
                session.close_inspection();
                present_relic(&bot, msg.chat.id, &current).await?;
                dialogue
                    .update(State::Inspecting { session, position })
                    .await?;
                return Ok(());
            }
            _ => {
                bot.send_message(msg.chat.id, CHOOSE_AN_OPTION)
                    .reply_markup(relic_keyboard())
                    .await?;
                return Ok(());
            }
        }
    }

    if position >= session.display_order().len() {
        bot.send_message(msg.chat.id, review_text(&session))
            .reply_markup(review_keyboard(&session))
            .await?;
        dialogue.update(State::Reviewing { session }).await?;
        return Ok(());
    }

    let relic = session.display_order()[position].clone();
    present_relic(&bot, msg.chat.id, &relic).await?;

    dialogue
        .update(State::Inspecting {
            session,
            position: position + 1,
        })
        .await?;
    Ok(())
}

async fn review_judgments(
    bot: Bot,
    dialogue: RoomDialogue,
    mut session: ChapelSession,
    msg: Message,
) -> HandlerResult {
    match msg.text() {
        Some(SUBMIT) => match session.submit() {
            Ok(()) => {
                debug!(
                    "visitor in chat {} submitted with score {}",
                    msg.chat.id,
                    session.score()
                );
                bot.send_message(msg.chat.id, results_text(&session))
                    .parse_mode(ParseMode::Html)
                    .reply_markup(review_keyboard(&session))
                    .await?;
                if session.is_unlocked() {
                    bot.send_message(msg.chat.id, CHAPEL_CLUE)
                        .parse_mode(ParseMode::Html)
                        .await?;
                }
                dialogue.update(State::Reviewing { session }).await?;
            }
            Err(err) => {
                bot.send_message(msg.chat.id, err.to_string())
                    .reply_markup(review_keyboard(&session))
                    .await?;
            }
        },
        Some(RESET) => {
            session.reset();
            let keyboard = KeyboardMarkup::new(vec![vec![KeyboardButton::new(ENTER_CHAPEL)]]);
            bot.send_message(
                msg.chat.id,
                "The relics have been rearranged. Step in whenever you are ready.",
            )
            .reply_markup(keyboard)
            .await?;
            dialogue
                .update(State::Inspecting {
                    session,
                    position: 0,
                })
                .await?;
        }
        Some(text) => {
            let picked = session
                .display_order()
                .iter()
                .find(|r| r.name == text)
                .cloned();
            match picked {
                Some(relic) => {
                    present_relic(&bot, msg.chat.id, &relic).await?;
                    dialogue
                        .update(State::Amending {
                            session,
                            relic_id: relic.id,
                        })
                        .await?;
                }
                None => {
                    bot.send_message(msg.chat.id, CHOOSE_AN_OPTION)
                        .reply_markup(review_keyboard(&session))
                        .await?;
                }
            }
        }
        None => {
            bot.send_message(msg.chat.id, CHOOSE_AN_OPTION)
                .reply_markup(review_keyboard(&session))
                .await?;
        }
    }
    Ok(())
}

async fn amend_judgment(
    bot: Bot,
    dialogue: RoomDialogue,
    (mut session, relic_id): (ChapelSession, String),
    msg: Message,
) -> HandlerResult {
    // The id always comes from the review keyboard, so the lookup holds
    let relic = match session.relic(&relic_id) {
        Some(relic) => relic.clone(),
        None => {
            bot.send_message(msg.chat.id, review_text(&session))
                .reply_markup(review_keyboard(&session))
                .await?;
            dialogue.update(State::Reviewing { session }).await?;
            return Ok(());
        }
    };

    match msg.text() {
        Some(YES_PLAUSIBLE) => session.record_answer(&relic.id, true)?,
        Some(NO_DUBIOUS) => session.record_answer(&relic.id, false)?,
        Some(INFO) => {
            session.open_inspection(&relic.id)?;
            if let Some(inspected) = session.active_inspection() {
                send_notes(&bot, msg.chat.id, inspected).await?;
            }
            session.close_inspection();
            present_relic(&bot, msg.chat.id, &relic).await?;
            dialogue
                .update(State::Amending { session, relic_id })
                .await?;
            return Ok(());
        }
        _ => {
            bot.send_message(msg.chat.id, CHOOSE_AN_OPTION)
                .reply_markup(relic_keyboard())
                .await?;
            return Ok(());
        }
    }

    let mut summary = review_text(&session);
    if session.is_submitted() {
        summary.push_str("\n\nPress Submit again to re-grade your judgments.");
    }
    bot.send_message(msg.chat.id, summary)
        .reply_markup(review_keyboard(&session))
        .await?;

    dialogue.update(State::Reviewing { session }).await?;
    Ok(())
}

async fn present_relic(bot: &Bot, chat_id: ChatId, relic: &Relic) -> HandlerResult {
    let text = format!("{} <b>{}</b>\n{}", relic.emoji, relic.name, relic.claim);
    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(relic_keyboard())
        .await?;
    Ok(())
}

async fn send_notes(bot: &Bot, chat_id: ChatId, relic: &Relic) -> HandlerResult {
    let notes = relic
        .notes
        .iter()
        .map(|n| format!("• {}", n))
        .collect::<Vec<_>>()
        .join("\n");
    bot.send_message(
        chat_id,
        format!("{} <b>{}</b>\n\n{}", relic.emoji, relic.name, notes),
    )
    .parse_mode(ParseMode::Html)
    .await?;
    Ok(())
}

fn relic_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![
            KeyboardButton::new(YES_PLAUSIBLE),
            KeyboardButton::new(NO_DUBIOUS),
        ],
        vec![KeyboardButton::new(INFO)],
    ])
}

fn review_keyboard(session: &ChapelSession) -> KeyboardMarkup {
    let mut rows = session
        .display_order()
        .iter()
        .map(|r| vec![KeyboardButton::new(r.name.clone())])
        .collect::<Vec<_>>();
    rows.push(vec![
        KeyboardButton::new(SUBMIT),
        KeyboardButton::new(RESET),
    ]);
    KeyboardMarkup::new(rows)
}

fn review_text(session: &ChapelSession) -> String {
    let mut lines = session
        .display_order()
        .iter()
        .map(|r| {
            let verdict = match session.answer_for(&r.id) {
                Some(true) => "judged plausible",
                Some(false) => "judged dubious",
                None => "not yet judged",
            };
            format!("{} {}: {}", r.emoji, r.name, verdict)
        })
        .collect::<Vec<_>>();

    let answered = session
        .display_order()
        .iter()
        .filter(|r| session.answer_for(&r.id).is_some())
        .count();
    lines.push(String::new());
    lines.push(format!(
        "You have judged {} of {} relics. Pick a relic to change your judgment, or press Submit.",
        answered,
        session.display_order().len()
    ));

    lines.join("\n")
}

fn results_text(session: &ChapelSession) -> String {
    let mut lines = session
        .display_order()
        .iter()
        .map(|r| {
            if session.answer_for(&r.id) == Some(r.plausible) {
                format!("✓ Correct: {} {}", r.emoji, r.name)
            } else {
                let truth = if r.plausible {
                    "Plausible"
                } else {
                    "Anachronistic"
                };
                format!("✗ {}: {} {}", truth, r.emoji, r.name)
            }
        })
        .collect::<Vec<_>>();

    let score = session.score();
    let verdict = if score >= UNLOCK_THRESHOLD {
        "Well reasoned."
    } else {
        "Review the notes and try again."
    };
    lines.push(String::new());
    lines.push(format!(
        "You scored <b>{}</b> / {}. {}",
        score,
        session.display_order().len(),
        verdict
    ));

    lines.join("\n")
}
