use rand::Rng;

/// Call-to-action lines appended to generated copy.
pub const CALLS_TO_ACTION: &[&str] = &[
    "🛒 BUY NOW before it sells out!",
    "⏰ Limited-time offer, grab yours today!",
    "👉 Tap the link and get yours now!",
    "🔥 Don't miss this deal!",
    "💥 Best price of the week, order now!",
    "🏃 Hurry, stock is running low!",
];

/// Picks one line from [`CALLS_TO_ACTION`] using the supplied random source.
pub fn pick_cta<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    CALLS_TO_ACTION[rng.random_range(0..CALLS_TO_ACTION.len())]
}
