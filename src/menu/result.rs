use super::*;
use crate::levels::flow::ResultChoice;
use crate::levels::{LevelSession, Planet};

fn result_button(
    parent: &mut ChildSpawnerCommands<'_>,
    font: &GameFont,
    caption: &str,
    palette: ButtonPalette,
    choice: ResultChoice,
) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(170.0),
                height: Val::Px(44.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(palette.bg),
            BorderColor::all(palette.border),
            ResultButton(choice),
        ))
        .with_children(|btn| {
            label(btn, font, caption, 16.0, palette.text);
        });
}

/// Headline and gem line for the finished stage.
fn result_lines(planet: Planet, victory: bool) -> (&'static str, String) {
    if victory {
        let gems = planet.gems();
        let noun = if gems.len() > 1 { "gems" } else { "gem" };
        let detail = format!("{} cleared · {} {noun} obtained", planet.name(), gems.join(" and "));
        ("VICTORY", detail)
    } else {
        ("DEFEAT", format!("{} · {}", planet.name(), planet.title()))
    }
}

/// Spawn the victory/defeat card above the level and below the dialogue.
pub fn setup_result_overlay(
    mut commands: Commands,
    font: Res<GameFont>,
    state: Res<State<GameState>>,
    session: Res<LevelSession>,
) {
    let Some(planet) = session.planet() else {
        return;
    };
    let victory = *state.get() == GameState::Victory;
    let (headline, detail) = result_lines(planet, victory);
    let (headline_color, card_border) = if victory {
        (title_color(), START.border)
    } else {
        (Color::srgb(1.0, 0.22, 0.22), QUIT.border)
    };

    spawn_overlay(
        &mut commands,
        0.55,
        300,
        Color::srgb(0.04, 0.04, 0.07),
        card_border,
        ResultRoot,
        |card| {
            label(card, &font, headline, 46.0, headline_color);
            label(card, &font, detail, 18.0, subtitle_color());
            spacer(card, 4.0);

            card.spawn(Node {
                flex_direction: FlexDirection::Row,
                column_gap: Val::Px(12.0),
                ..default()
            })
            .with_children(|row| {
                result_button(row, &font, "RETRY (R)", STORY, ResultChoice::Retry);
                if victory {
                    let next = match planet.next() {
                        Some(next) => ResultChoice::Next(next),
                        None => ResultChoice::Epilogue,
                    };
                    result_button(row, &font, "NEXT (N)", START, next);
                }
                result_button(row, &font, "STAGES (Q)", QUIT, ResultChoice::LevelSelect);
            });

            label(
                card,
                &font,
                "ENTER advances the message",
                12.0,
                hint_color(),
            );
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn victory_line_names_the_gems() {
        let (headline, detail) = result_lines(Planet::Neptune, true);
        assert_eq!(headline, "VICTORY");
        assert_eq!(detail, "Neptune cleared · Aquarius and Pisces gems obtained");
    }

    #[test]
    fn defeat_line_names_the_game() {
        let (headline, detail) = result_lines(Planet::Uranus, false);
        assert_eq!(headline, "DEFEAT");
        assert_eq!(detail, "Uranus · Balloon Pop");
    }
}
