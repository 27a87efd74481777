//! Plain-text conversion report.

use std::fmt::Write;

use crate::model::ProjectModel;
use crate::plugins::PluginMatch;

const RULE_WIDTH: usize = 60;
/// Suggestions listed per plugin in the report.
const REPORT_SUGGESTIONS: usize = 3;
/// Preset name the host stores for an unnamed plugin state.
const DEFAULT_PRESET: &str = "#default";

const NOT_TRANSFERRED: [&str; 3] = [
    "Plugin settings/parameters (not compatible across DAWs)",
    "Automation data (requires deeper binary parsing)",
    "Bus/send routing (recreate manually in Ableton)",
];

/// Summarize what was converted, what the mixer got, which plugins were
/// found (with suggested replacements) and what could not be carried over.
pub fn generate_report(project: &ProjectModel, matches: &[PluginMatch]) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "  Logic Pro to Ableton Conversion Report");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Project: {}", project.name);
    let _ = writeln!(
        out,
        "Tempo: {:?} BPM | Time Sig: {}/{} | Sample Rate: {}",
        project.tempo, project.time_sig_numerator, project.time_sig_denominator, project.sample_rate
    );
    out.push('\n');

    write_tracks(&mut out, project);
    write_mixer(&mut out, project);
    write_plugins(&mut out, matches);

    let _ = writeln!(out, "NOT TRANSFERRED:");
    for item in NOT_TRANSFERRED {
        let _ = writeln!(out, "  - {item}");
    }
    out.push('\n');
    out.push_str(&rule);
    out
}

fn write_tracks(out: &mut String, project: &ProjectModel) {
    let _ = writeln!(out, "TRACKS TRANSFERRED ({}):", project.track_names.len());
    for (i, track) in project.track_names.iter().enumerate() {
        let takes = project.files_for_track(track).filter(|r| r.take_number > 0).count();
        let comps: Vec<&str> = project
            .files_for_track(track)
            .filter(|r| r.is_comp)
            .map(|r| r.comp_label.as_str())
            .collect();
        let plain = project
            .files_for_track(track)
            .filter(|r| r.take_number == 0 && !r.is_comp)
            .count();

        let mut parts = Vec::new();
        if takes > 0 {
            parts.push(format!("{takes} takes"));
        }
        if !comps.is_empty() {
            parts.push(format!("comp: {}", comps.join(", ")));
        }
        if plain > 0 && takes == 0 {
            parts.push(format!("{plain} file(s)"));
        }
        let detail = if parts.is_empty() {
            String::new()
        } else {
            format!(" - {}", parts.join(", "))
        };
        let _ = writeln!(out, "  {}. {track}{detail}", i + 1);
    }
    out.push('\n');
}

fn write_mixer(out: &mut String, project: &ProjectModel) {
    match &project.mixer_state {
        Some(states) if !states.is_empty() => {
            let _ = writeln!(out, "MIXER STATE APPLIED ({} tracks):", states.len());
            for (name, state) in states {
                let mut parts = vec![format!("{:+.1} dB", state.volume_db)];
                if state.pan != 0.0 {
                    let side = if state.pan < 0.0 { "L" } else { "R" };
                    parts.push(format!("pan {:.0}%{side}", state.pan.abs() * 100.0));
                }
                if state.is_muted {
                    parts.push("MUTED".to_string());
                }
                if state.is_soloed {
                    parts.push("SOLO".to_string());
                }
                let _ = writeln!(out, "  {name} - {}", parts.join(", "));
            }
        }
        _ => {
            let _ = writeln!(out, "MIXER STATE: defaults (0 dB, center pan)");
            let _ = writeln!(
                out,
                "  Tip: use --mixer {} to set per-track levels",
                crate::paths::MIXER_OVERRIDES_FILE
            );
        }
    }
    out.push('\n');
}

fn write_plugins(out: &mut String, matches: &[PluginMatch]) {
    let _ = writeln!(out, "PLUGINS FOUND ({}):", matches.len());
    for m in matches {
        let preset = if m.preset_name.is_empty() || m.preset_name == DEFAULT_PRESET {
            String::new()
        } else {
            format!(" \"{}\"", m.preset_name)
        };
        let suggestions = if m.suggestions.is_empty() {
            "(no match found)".to_string()
        } else {
            m.suggestions
                .iter()
                .take(REPORT_SUGGESTIONS)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };
        let _ = writeln!(out, "  {}{preset}", m.source_name);
        let _ = writeln!(out, "    -> Suggested: {suggestions}");
    }
    out.push('\n');
}
