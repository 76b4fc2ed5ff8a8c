//! Input handling - maps key events to edits of the shared state.

use crossterm::event::{
  KeyCode,
  KeyEvent,
  KeyEventKind,
  KeyModifiers,
};
use the_lib::model::ResultModel;

use crate::ctx::Ctx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  Insert(char),
  DeleteBackward,
  DeleteForward,
  CaretLeft,
  CaretRight,
  CaretHome,
  CaretEnd,
  SelectNext,
  SelectPrev,
  PageDown,
  PageUp,
  ToggleMark,
  PushStack,
  ToggleQueryMode,
  Finish,
  Cancel,
}

pub fn to_action(event: &KeyEvent) -> Option<Action> {
  let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
  let action = match event.code {
    KeyCode::Char(' ') if ctrl => Action::ToggleMark,
    KeyCode::Char('n') if ctrl => Action::SelectNext,
    KeyCode::Char('p') if ctrl => Action::SelectPrev,
    KeyCode::Char('s') if ctrl => Action::PushStack,
    KeyCode::Char('c') if ctrl => Action::Cancel,
    KeyCode::Char(_) if ctrl || event.modifiers.contains(KeyModifiers::ALT) => return None,
    KeyCode::Char(c) => Action::Insert(c),
    KeyCode::Backspace => Action::DeleteBackward,
    KeyCode::Delete => Action::DeleteForward,
    KeyCode::Left => Action::CaretLeft,
    KeyCode::Right => Action::CaretRight,
    KeyCode::Home => Action::CaretHome,
    KeyCode::End => Action::CaretEnd,
    KeyCode::Down => Action::SelectNext,
    KeyCode::Up => Action::SelectPrev,
    KeyCode::PageDown => Action::PageDown,
    KeyCode::PageUp => Action::PageUp,
    KeyCode::Tab => Action::ToggleQueryMode,
    KeyCode::Enter => Action::Finish,
    KeyCode::Esc => Action::Cancel,
    _ => return None,
  };
  Some(action)
}

/// Short readable name of a key, e.g. `C-n` or `RET`.
pub fn key_name(event: &KeyEvent) -> String {
  let key = match event.code {
    KeyCode::Char(' ') => "SPC".to_string(),
    KeyCode::Char(c) => c.to_string(),
    KeyCode::Enter => "RET".to_string(),
    KeyCode::Tab => "TAB".to_string(),
    KeyCode::Esc => "ESC".to_string(),
    KeyCode::Backspace => "DEL".to_string(),
    KeyCode::Delete => "<delete>".to_string(),
    KeyCode::Left => "<left>".to_string(),
    KeyCode::Right => "<right>".to_string(),
    KeyCode::Up => "<up>".to_string(),
    KeyCode::Down => "<down>".to_string(),
    KeyCode::Home => "<home>".to_string(),
    KeyCode::End => "<end>".to_string(),
    KeyCode::PageUp => "<prior>".to_string(),
    KeyCode::PageDown => "<next>".to_string(),
    KeyCode::F(n) => format!("<f{n}>"),
    other => format!("{other:?}"),
  };

  let mut name = String::new();
  if event.modifiers.contains(KeyModifiers::CONTROL) {
    name.push_str("C-");
  }
  if event.modifiers.contains(KeyModifiers::ALT) {
    name.push_str("M-");
  }
  name.push_str(&key);
  name
}

pub fn handle_key(ctx: &mut Ctx, event: KeyEvent) {
  if event.kind == KeyEventKind::Release {
    return;
  }
  ctx.set_last_key(key_name(&event));
  let Some(action) = to_action(&event) else {
    log::trace!("unbound key {}", key_name(&event));
    ctx.needs_render = true;
    return;
  };

  if ctx.query_mode() {
    apply(ctx, action);
  } else {
    apply_stack_name(ctx, action);
  }
}

fn apply(ctx: &mut Ctx, action: Action) {
  match action {
    Action::Insert(c) => ctx.insert_char(c),
    Action::DeleteBackward => ctx.delete_backward(),
    Action::DeleteForward => ctx.delete_forward(),
    Action::CaretLeft => ctx.move_caret(-1),
    Action::CaretRight => ctx.move_caret(1),
    Action::CaretHome => ctx.caret_home(),
    Action::CaretEnd => ctx.caret_end(),
    Action::SelectNext => ctx.select_next(),
    Action::SelectPrev => ctx.select_prev(),
    Action::PageDown => ctx.page_down(),
    Action::PageUp => ctx.page_up(),
    Action::ToggleMark => ctx.toggle_mark(),
    Action::PushStack => ctx.push_stack(),
    Action::ToggleQueryMode => ctx.toggle_query_mode(),
    Action::Finish => ctx.finish(),
    Action::Cancel => ctx.cancel(),
  }
}

/// Keys while naming a stack entry: text edits the name, Enter keeps it,
/// Tab or Esc drops it.
fn apply_stack_name(ctx: &mut Ctx, action: Action) {
  match action {
    Action::Insert(c) => ctx.stack_name_push(c),
    Action::DeleteBackward => ctx.stack_name_pop(),
    Action::Finish => ctx.commit_stack_name(),
    Action::ToggleQueryMode | Action::Cancel => ctx.toggle_query_mode(),
    _ => ctx.needs_render = true,
  }
}

#[cfg(test)]
mod test {
  use super::*;

  fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
  }

  fn press(ctx: &mut Ctx, code: KeyCode) {
    handle_key(ctx, key(code, KeyModifiers::NONE));
  }

  #[test]
  fn control_bindings() {
    let ctrl = KeyModifiers::CONTROL;
    assert_eq!(to_action(&key(KeyCode::Char(' '), ctrl)), Some(Action::ToggleMark));
    assert_eq!(to_action(&key(KeyCode::Char('n'), ctrl)), Some(Action::SelectNext));
    assert_eq!(to_action(&key(KeyCode::Char('x'), ctrl)), None);
    assert_eq!(
      to_action(&key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
      Some(Action::Insert('A'))
    );
  }

  #[test]
  fn key_names() {
    assert_eq!(key_name(&key(KeyCode::Char('n'), KeyModifiers::CONTROL)), "C-n");
    assert_eq!(key_name(&key(KeyCode::Enter, KeyModifiers::NONE)), "RET");
    assert_eq!(key_name(&key(KeyCode::Char(' '), KeyModifiers::CONTROL)), "C-SPC");
  }

  #[test]
  fn naming_a_stack_entry() {
    let mut ctx = Ctx::new(10);
    ctx.push_lines(["alpha".to_string()]);
    for c in "al".chars() {
      press(&mut ctx, KeyCode::Char(c));
    }
    handle_key(&mut ctx, key(KeyCode::Char('s'), KeyModifiers::CONTROL));
    press(&mut ctx, KeyCode::Tab);
    for c in "ab".chars() {
      press(&mut ctx, KeyCode::Char(c));
    }
    press(&mut ctx, KeyCode::Backspace);
    press(&mut ctx, KeyCode::Enter);

    assert!(ctx.query_mode());
    assert!(!ctx.should_quit);
    assert_eq!(ctx.stack(), ["a: al"]);
    assert_eq!(ctx.last_key(), "RET");
  }

  #[test]
  fn escape_cancels() {
    let mut ctx = Ctx::new(10);
    press(&mut ctx, KeyCode::Esc);
    assert!(ctx.should_quit);
    assert_eq!(ctx.selection, None);
  }
}
