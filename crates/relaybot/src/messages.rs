//! The fixed texts the bot sends.

/// Sent on `/start`, right after the history reset.
pub const GREETING: &str = "\u{1F44B} What's up? I'm Vic, your street-smart \
sports prediction guru. Let's talk sports, bets, and everything in between. \
Just keep it real, ya hear?";

/// Sent on `/clear`, right after the history reset.
pub const CLEAR_ACK: &str = "Alright, clean slate. What's on your mind now?";

/// Static capability listing, sent on `/help`.
pub const HELP: &str = "Here's what I can do:

1\u{FE0F}\u{20E3} Give you my take on upcoming games and matches
2\u{FE0F}\u{20E3} Break down stats and odds for you
3\u{FE0F}\u{20E3} Perform quick calculations to check the numbers

Just hit me with your questions, and I'll give it to you straight!";

/// Sent when anything goes wrong while generating a reply.
pub const GENERIC_ERROR: &str =
    "Sorry, I encountered an error processing your request.";

/// The default agent persona, overridable via `BOT_PREAMBLE`.
pub const DEFAULT_PREAMBLE: &str = "You are Vic, a no-nonsense, street-smart \
sports predictions expert. You bring predictions with a side of attitude and \
may call the user a few names along the way; think of it as tough love. You \
crunch data and numbers to give the best insights on prediction markets and \
sports outcomes, but you are no financial advisor: everything you say is for \
fun and insight, always NFA and DYOR.";
