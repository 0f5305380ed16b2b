/// Catalog used when no catalog file is configured.
pub const BUILTIN_CATALOG: &str = r#"
root = "root"

[settings]
location = "Berlin, Germany"
theme = "system"
second_order = "off"
units = "metric"

[[pages]]
id = "root"
title = "Settings"
subtitle = "Sky over {location}"

[[pages.commands]]
id = "root.setting.location"
label = "Location"
subtitle = "{location}"
keywords = ["city", "place", "where"]
opens = "location"
shortcuts = [{ key = "l" }]

[[pages.commands]]
id = "root.setting.theme"
label = "Theme"
subtitle = "{theme}"
keywords = ["appearance", "dark", "light"]
opens = "theme"
shortcuts = [{ key = "t" }]

[[pages.commands]]
id = "root.setting.second-order"
label = "Second-order twilight"
subtitle = "{second_order}"
keywords = ["sky", "dusk", "dawn"]
effect = { kind = "toggle", setting = "second_order" }
shortcuts = [{ key = "s" }]

[[pages.commands]]
id = "root.setting.units"
label = "Units"
subtitle = "{units}"
effect = { kind = "toggle", setting = "units", on = "imperial", off = "metric" }
shortcuts = [{ key = "u" }, { key = "x", target_item_id = "root.setting.units" }]

[[pages.commands]]
id = "root.sync"
label = "Sync settings"
subtitle = "Upload to the cloud"
keywords = ["backup", "cloud"]
effect = { kind = "fail", message = "sync is not configured" }

[[pages.commands]]
id = "root.about"
label = "About"
effect = { kind = "push", page = "about" }
shortcuts = [{ key = "?" }]

[[pages.commands]]
id = "root.close"
label = "Close palette"
keywords = ["quit", "exit"]
effect = { kind = "close" }

[[pages]]
id = "location"
title = "Location"
subtitle = "Currently {location}"
mode = "input"
placeholder = "City, Country"
submit_label = "Save location"
on_submit = { setting = "location", then = "pop" }

[[pages]]
id = "theme"
title = "Theme"
empty_state_text = "No matching theme"

[[pages.commands]]
id = "theme.system"
label = "Follow system"
effect = { kind = "set", setting = "theme", value = "system", then = "pop" }

[[pages.commands]]
id = "theme.dark"
label = "Dark"
effect = { kind = "set", setting = "theme", value = "dark", then = "pop" }

[[pages.commands]]
id = "theme.light"
label = "Light"
effect = { kind = "set", setting = "theme", value = "light", then = "pop" }

[[pages.commands]]
id = "theme.sky"
label = "Match the sky"
subtitle = "Needs a sky provider"
disabled = true
effect = { kind = "stay" }

[[pages]]
id = "about"
title = "About"

[[pages.commands]]
id = "about.version"
label = "palnav"
subtitle = "Command palette navigator"
effect = { kind = "stay" }

[[pages.commands]]
id = "about.back"
label = "Back to settings"
effect = { kind = "pop" }
"#;
