/// Builds the image-generation instruction for a word pair.
///
/// The picture shows `source_word` on a solid background that contrasts with
/// the object's usual colour, framed as a square with a white border, with
/// `target_word` written underneath.
pub fn build_image_prompt(source_word: &str, target_word: &str) -> String {
    let source_word = source_word.trim();
    let target_word = target_word.trim();

    format!(
        "Create an image. \
         Display a picture of {source_word} set against a solid background. \
         Make sure the background color contrasts with the typical color of {source_word} \
         (for example, do not use a red background if {source_word} is usually red). \
         The picture should be square with a white border. \
         Below the picture of {source_word}, show the word \"{target_word}\" in a prominent font."
    )
}
